//! Live refresh validation
//!
//! Runs one real refresh against the default public sources and prints the
//! outcome. Requires network access; intended for manual validation, not
//! for CI.

use rthosts_core::config::RefreshConfig;
use rthosts_core::{RefreshEngine, Result, resolver};
use rthosts_http::{HttpHostSource, HttpProbe};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Activate into the process-wide resolver state so lookups below see
    // the refreshed table
    let overrides = resolver::global().overrides().clone();

    let (engine, mut events) = RefreshEngine::new(
        Box::new(HttpHostSource::new(None)),
        Box::new(HttpProbe::new(None)),
        overrides.clone(),
        RefreshConfig::default(),
    )?;

    let outcome = engine.refresh_once().await;
    println!("refresh outcome: {:?}", outcome);

    while let Ok(event) = events.try_recv() {
        println!("event: {:?}", event);
    }

    println!("active entries: {}", overrides.len());

    if overrides.lookup("github.com").is_some() {
        let addrs = resolver::resolve("github.com", 443).await?;
        println!("github.com -> {:?}", addrs);
    }

    Ok(())
}
