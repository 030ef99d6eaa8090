// # rthostsd - Runtime Hosts Daemon
//
// The rthostsd daemon is a THIN integration layer:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering transports and wiring the engine to the schedule
// 4. Restoring default resolution on shutdown
//
// All pipeline logic lives in rthosts-core; no business logic belongs here.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `RTHOSTS_ENABLE`: Enable the override feature (default: true)
// - `RTHOSTS_UPDATE_HOUR`: Hour of day (UTC) for the daily refresh (default: 4)
// - `RTHOSTS_PRIMARY_URL`: Primary hosts source URL
// - `RTHOSTS_SECONDARY_URLS`: Comma-separated secondary source URLs
// - `RTHOSTS_PROBE_URL`: Connectivity-check URL between the two phases
// - `RTHOSTS_FETCH_TIMEOUT_SECS`: Per-source fetch timeout (default: 15)
// - `RTHOSTS_PROBE_TIMEOUT_SECS`: Probe timeout (default: 5)
// - `RTHOSTS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export RTHOSTS_UPDATE_HOUR=4
// export RTHOSTS_PRIMARY_URL=https://raw.hellogithub.com/hosts
// export RTHOSTS_PROBE_URL=https://api.github.com
//
// rthostsd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use rthosts_core::config::{RefreshConfig, RuntimeHostsConfig, ScheduleConfig};
use rthosts_core::{DailyTrigger, RefreshEngine, ScheduleBinding, SourceRegistry, resolver};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    enable: bool,
    update_hour: u8,
    primary_url: String,
    secondary_urls: Vec<String>,
    probe_url: String,
    fetch_timeout_secs: u64,
    probe_timeout_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let defaults = RefreshConfig::default();

        Ok(Self {
            enable: env::var("RTHOSTS_ENABLE")
                .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(true),
            update_hour: env::var("RTHOSTS_UPDATE_HOUR")
                .ok()
                .map(|s| {
                    s.parse()
                        .map_err(|_| anyhow::anyhow!("RTHOSTS_UPDATE_HOUR is not a number: {}", s))
                })
                .transpose()?
                .unwrap_or(4),
            primary_url: env::var("RTHOSTS_PRIMARY_URL").unwrap_or(defaults.primary_url),
            secondary_urls: match env::var("RTHOSTS_SECONDARY_URLS") {
                Ok(list) => list
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                Err(_) => defaults.secondary_urls,
            },
            probe_url: env::var("RTHOSTS_PROBE_URL").unwrap_or(defaults.probe_url),
            fetch_timeout_secs: env::var("RTHOSTS_FETCH_TIMEOUT_SECS")
                .ok()
                .map(|s| s.parse().unwrap_or(defaults.fetch_timeout_secs))
                .unwrap_or(defaults.fetch_timeout_secs),
            probe_timeout_secs: env::var("RTHOSTS_PROBE_TIMEOUT_SECS")
                .ok()
                .map(|s| s.parse().unwrap_or(defaults.probe_timeout_secs))
                .unwrap_or(defaults.probe_timeout_secs),
            log_level: env::var("RTHOSTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.update_hour > 23 {
            anyhow::bail!(
                "RTHOSTS_UPDATE_HOUR must be between 0 and 23. Got: {}",
                self.update_hour
            );
        }

        for (name, url) in [
            ("RTHOSTS_PRIMARY_URL", self.primary_url.as_str()),
            ("RTHOSTS_PROBE_URL", self.probe_url.as_str()),
        ] {
            if url.is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("{} must use HTTP or HTTPS scheme. Got: {}", name, url);
            }

            // Warn if using HTTP (not HTTPS)
            if url.starts_with("http://") {
                eprintln!(
                    "WARNING: {} uses HTTP (not HTTPS). \
                          This is less secure. Consider using HTTPS.",
                    name
                );
            }
        }

        for url in &self.secondary_urls {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!(
                    "RTHOSTS_SECONDARY_URLS entries must use HTTP or HTTPS scheme. Got: {}",
                    url
                );
            }
        }

        if !(1..=300).contains(&self.fetch_timeout_secs) {
            anyhow::bail!(
                "RTHOSTS_FETCH_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                self.fetch_timeout_secs
            );
        }

        if !(1..=60).contains(&self.probe_timeout_secs) {
            anyhow::bail!(
                "RTHOSTS_PROBE_TIMEOUT_SECS must be between 1 and 60 seconds. Got: {}",
                self.probe_timeout_secs
            );
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "RTHOSTS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Map onto the core configuration
    fn to_core_config(&self) -> RuntimeHostsConfig {
        RuntimeHostsConfig {
            refresh: RefreshConfig {
                primary_url: self.primary_url.clone(),
                secondary_urls: self.secondary_urls.clone(),
                probe_url: self.probe_url.clone(),
                fetch_timeout_secs: self.fetch_timeout_secs,
                probe_timeout_secs: self.probe_timeout_secs,
                ..RefreshConfig::default()
            },
            schedule: ScheduleConfig {
                enable: self.enable,
                update_hour: self.update_hour,
            },
            ..RuntimeHostsConfig::default()
        }
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DaemonExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting rthostsd daemon");
    info!(
        "Primary source: {}, {} secondary source(s)",
        config.primary_url,
        config.secondary_urls.len()
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            DaemonExitCode::RuntimeError
        } else {
            DaemonExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let core_config = config.to_core_config();
    core_config.validate()?;

    // Create transport registry and register built-in transports
    let registry = SourceRegistry::new();

    #[cfg(feature = "http")]
    {
        info!("Registering HTTP transports");
        rthosts_http::register(&registry);
    }

    let source = registry.create_source(&core_config.source)?;
    let probe = registry.create_probe(&core_config.probe)?;

    // The engine activates into the same override state the process-wide
    // resolver consults
    let overrides = resolver::global().overrides().clone();

    let (engine, mut event_rx) =
        RefreshEngine::new(source, probe, overrides, core_config.refresh.clone())?;
    let engine = Arc::new(engine);

    // Drain engine events into the log
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            tracing::debug!(?event, "engine event");
        }
    });

    let trigger = DailyTrigger::new(core_config.schedule.update_hour);
    let binding = ScheduleBinding::new(Arc::clone(&engine), Box::new(trigger));

    if core_config.schedule.enable {
        info!(
            hour = core_config.schedule.update_hour,
            "Enabling runtime hosts overrides"
        );
        binding.enable().await;
    } else {
        info!("Runtime hosts overrides disabled by configuration");
    }

    // Wait for shutdown signal
    let signal_name = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal_name);

    // Restore default resolution before exiting
    binding.disable();
    info!("Shutting down daemon");

    Ok(())
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
