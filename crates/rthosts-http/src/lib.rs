// # HTTP Transports
//
// This crate provides the HTTP implementations of the runtime hosts
// transport traits:
//
// - `HttpHostSource`: one GET per fetch, body parsed as a hosts-format
//   document
// - `HttpProbe`: one HEAD per probe (no body transfer), success status only
//
// ## Responsibilities
//
// Both transports are single-shot. Retry policy is owned by the schedule
// (the next daily trigger), phase gating by the engine; neither lives here.
// Every request carries a per-request timeout so a hang is bounded by the
// caller's budget, never open-ended.

use rthosts_core::SourceRegistry;
use rthosts_core::config::{ProbeConfig, SourceConfig};
use rthosts_core::table::HostTable;
use rthosts_core::traits::{ConnectivityProbe, HostSource, HostSourceFactory, ProbeFactory};
use rthosts_core::{Error, Result};

use std::time::Duration;

/// Default User-Agent when none is configured
const DEFAULT_USER_AGENT: &str = concat!("rthosts/", env!("CARGO_PKG_VERSION"));

fn build_client(user_agent: Option<&str>) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
        .build()
        .unwrap_or_default()
}

/// HTTP-based host source
pub struct HttpHostSource {
    /// HTTP client (timeouts are applied per request)
    client: reqwest::Client,
}

impl HttpHostSource {
    /// Create a new HTTP host source
    pub fn new(user_agent: Option<&str>) -> Self {
        Self {
            client: build_client(user_agent),
        }
    }
}

impl Default for HttpHostSource {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait::async_trait]
impl HostSource for HttpHostSource {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<HostTable> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| Error::fetch(url, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::fetch(
                url,
                format!("HTTP status: {}", response.status()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::fetch(url, format!("failed to read response: {}", e)))?;

        let table = HostTable::parse(&body);
        tracing::debug!(url, entries = table.len(), "hosts document fetched");
        Ok(table)
    }
}

/// HTTP HEAD-based connectivity probe
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Create a new HTTP probe
    pub fn new(user_agent: Option<&str>) -> Self {
        Self {
            client: build_client(user_agent),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for HttpProbe {
    async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(url, "connectivity probe passed");
                true
            }
            Ok(response) => {
                tracing::warn!(url, status = %response.status(), "connectivity probe rejected");
                false
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "connectivity probe failed");
                false
            }
        }
    }
}

/// Factory for creating HTTP host sources
pub struct HttpSourceFactory;

impl HostSourceFactory for HttpSourceFactory {
    fn create(&self, config: &SourceConfig) -> Result<Box<dyn HostSource>> {
        match config {
            SourceConfig::Http { user_agent } => {
                Ok(Box::new(HttpHostSource::new(user_agent.as_deref())))
            }
            _ => Err(Error::config("Invalid config for HTTP host source")),
        }
    }
}

/// Factory for creating HTTP probes
pub struct HttpProbeFactory;

impl ProbeFactory for HttpProbeFactory {
    fn create(&self, config: &ProbeConfig) -> Result<Box<dyn ConnectivityProbe>> {
        match config {
            ProbeConfig::Http { user_agent } => {
                Ok(Box::new(HttpProbe::new(user_agent.as_deref())))
            }
            _ => Err(Error::config("Invalid config for HTTP probe")),
        }
    }
}

/// Register the HTTP transports with a registry
pub fn register(registry: &SourceRegistry) {
    registry.register_source("http", Box::new(HttpSourceFactory));
    registry.register_probe("http", Box::new(HttpProbeFactory));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_factory_creation() {
        let factory = HttpSourceFactory;

        let config = SourceConfig::Http { user_agent: None };
        assert!(factory.create(&config).is_ok());

        let config = SourceConfig::Custom {
            factory: "other".to_string(),
            config: serde_json::json!({}),
        };
        assert!(factory.create(&config).is_err());
    }

    #[test]
    fn probe_factory_creation() {
        let factory = HttpProbeFactory;

        let config = ProbeConfig::Http {
            user_agent: Some("test-agent/1.0".to_string()),
        };
        assert!(factory.create(&config).is_ok());
    }

    #[test]
    fn registration_installs_both_transports() {
        let registry = SourceRegistry::new();
        register(&registry);

        assert!(registry.has_source("http"));
        assert!(registry.has_probe("http"));
    }

    #[tokio::test]
    async fn probe_failure_is_a_value_not_an_error() {
        // Nothing listens on this port; the probe must answer false
        let probe = HttpProbe::new(None);
        let reachable = probe
            .probe("http://127.0.0.1:9", Duration::from_secs(1))
            .await;
        assert!(!reachable);
    }

    #[tokio::test]
    async fn fetch_transport_failure_is_a_fetch_error() {
        let source = HttpHostSource::new(None);
        let result = source
            .fetch("http://127.0.0.1:9/hosts", Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(Error::Fetch { .. })));
    }
}
