//! Minimal embedding example for rthosts-core
//!
//! This example demonstrates using rthosts-core as a library in a custom
//! application: canned transports drive the refresh pipeline, a schedule
//! binding manages the lifecycle, and lookups go through the override
//! resolver. No network access is needed.

#![allow(dead_code)]

use rthosts_core::config::RefreshConfig;
use rthosts_core::table::HostTable;
use rthosts_core::traits::{ConnectivityProbe, HostSource, RefreshTrigger, TriggerFire};
use rthosts_core::{
    ActiveOverrides, OverrideResolver, RefreshEngine, Resolve, Result, ScheduleBinding,
    SystemResolver,
};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::Stream;

/// Source serving fixed documents instead of fetching over the network
struct CannedSource;

#[async_trait::async_trait]
impl HostSource for CannedSource {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<HostTable> {
        let document = if url.ends_with("/primary") {
            "140.82.112.3 github.com\n185.199.108.133 raw.githubusercontent.com"
        } else {
            "104.244.42.1 api.themoviedb.org"
        };
        Ok(HostTable::parse(document))
    }
}

/// Probe that always passes the gate
struct AlwaysReachable;

#[async_trait::async_trait]
impl ConnectivityProbe for AlwaysReachable {
    async fn probe(&self, _url: &str, _timeout: Duration) -> bool {
        true
    }
}

/// Trigger that never fires: the only refresh is the one enable() runs
struct NeverTrigger {
    // Kept alive so the stream stays open for the binding's lifetime
    keep_alive:
        std::sync::Mutex<Option<tokio::sync::mpsc::UnboundedSender<TriggerFire>>>,
}

impl NeverTrigger {
    fn new() -> Self {
        Self {
            keep_alive: std::sync::Mutex::new(None),
        }
    }
}

impl RefreshTrigger for NeverTrigger {
    fn triggers(&self) -> Pin<Box<dyn Stream<Item = TriggerFire> + Send + 'static>> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        *self.keep_alive.lock().unwrap() = Some(tx);
        Box::pin(tokio_stream::wrappers::UnboundedReceiverStream::new(rx))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let overrides = ActiveOverrides::new();
    let config = RefreshConfig {
        primary_url: "https://demo.invalid/primary".to_string(),
        secondary_urls: vec!["https://demo.invalid/secondary".to_string()],
        probe_url: "https://demo.invalid/probe".to_string(),
        ..RefreshConfig::default()
    };

    let (engine, mut events) = RefreshEngine::new(
        Box::new(CannedSource),
        Box::new(AlwaysReachable),
        overrides.clone(),
        config,
    )?;

    let binding = ScheduleBinding::new(Arc::new(engine), Box::new(NeverTrigger::new()));

    // enable() runs the pipeline once immediately
    binding.enable().await;

    while let Ok(event) = events.try_recv() {
        println!("event: {:?}", event);
    }

    let resolver = OverrideResolver::new(overrides.clone(), Arc::new(SystemResolver::new()));
    for host in ["github.com", "api.themoviedb.org"] {
        let addrs = resolver.resolve(host, 443).await?;
        println!("{} -> {:?}", host, addrs);
    }

    // disable() clears the table; lookups fall back to the platform resolver
    binding.disable();
    println!("active entries after disable: {}", overrides.len());

    Ok(())
}
