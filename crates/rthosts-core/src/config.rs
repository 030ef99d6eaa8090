//! Configuration types for the runtime hosts system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main runtime hosts configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeHostsConfig {
    /// How hosts-format documents are fetched
    #[serde(default)]
    pub source: SourceConfig,

    /// How the connectivity gate is checked
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Refresh pipeline parameters (URLs, timeouts)
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Scheduling settings
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl RuntimeHostsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            source: SourceConfig::default(),
            probe: ProbeConfig::default(),
            refresh: RefreshConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.source.validate()?;
        self.probe.validate()?;
        self.refresh.validate()?;
        self.schedule.validate()?;
        Ok(())
    }
}

impl Default for RuntimeHostsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Host source transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    /// HTTP GET transport
    Http {
        /// Optional User-Agent header override
        #[serde(default)]
        user_agent: Option<String>,
    },

    /// Custom source transport
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl SourceConfig {
    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            SourceConfig::Http { .. } => Ok(()),
            SourceConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom source factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom source config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the source type name
    pub fn type_name(&self) -> &str {
        match self {
            SourceConfig::Http { .. } => "http",
            SourceConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Http { user_agent: None }
    }
}

/// Connectivity probe transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProbeConfig {
    /// HTTP HEAD transport
    Http {
        /// Optional User-Agent header override
        #[serde(default)]
        user_agent: Option<String>,
    },

    /// Custom probe transport
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProbeConfig {
    /// Validate the probe configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProbeConfig::Http { .. } => Ok(()),
            ProbeConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom probe factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom probe config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the probe type name
    pub fn type_name(&self) -> &str {
        match self {
            ProbeConfig::Http { .. } => "http",
            ProbeConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig::Http { user_agent: None }
    }
}

/// Refresh pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Primary hosts source; its success gates the rest of the run
    #[serde(default = "default_primary_url")]
    pub primary_url: String,

    /// Secondary hosts sources, fetched only after the connectivity gate
    /// passes, merged in listed order (later sources win on collision)
    #[serde(default = "default_secondary_urls")]
    pub secondary_urls: Vec<String>,

    /// Reachability-check target between the two phases
    #[serde(default = "default_probe_url")]
    pub probe_url: String,

    /// Upper bound on a single source fetch (in seconds)
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Upper bound on the connectivity probe (in seconds)
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Capacity of the internal event channel
    ///
    /// When full, new engine events are dropped (with a warning log) so a
    /// slow consumer cannot stall the pipeline.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl RefreshConfig {
    /// Validate the refresh configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_url("primary_url", &self.primary_url)?;
        validate_url("probe_url", &self.probe_url)?;
        for url in &self.secondary_urls {
            validate_url("secondary_urls", url)?;
        }

        if !(1..=300).contains(&self.fetch_timeout_secs) {
            return Err(crate::Error::config(format!(
                "fetch_timeout_secs must be between 1 and 300, got {}",
                self.fetch_timeout_secs
            )));
        }
        if !(1..=60).contains(&self.probe_timeout_secs) {
            return Err(crate::Error::config(format!(
                "probe_timeout_secs must be between 1 and 60, got {}",
                self.probe_timeout_secs
            )));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event_channel_capacity must be > 0"));
        }

        Ok(())
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            primary_url: default_primary_url(),
            secondary_urls: default_secondary_urls(),
            probe_url: default_probe_url(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Whether the feature is enabled at all
    #[serde(default = "default_enable")]
    pub enable: bool,

    /// Hour of day (UTC) at which the daily refresh fires, minute 0
    #[serde(default = "default_update_hour")]
    pub update_hour: u8,
}

impl ScheduleConfig {
    /// Validate the schedule configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.update_hour > 23 {
            return Err(crate::Error::config(format!(
                "update_hour must be between 0 and 23, got {}",
                self.update_hour
            )));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            update_hour: default_update_hour(),
        }
    }
}

fn validate_url(field: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", field)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use an http or https scheme, got: {}",
            field, url
        )));
    }
    Ok(())
}

fn default_primary_url() -> String {
    "https://raw.hellogithub.com/hosts".to_string()
}

fn default_secondary_urls() -> Vec<String> {
    vec![
        "https://raw.githubusercontent.com/cnwikee/CheckTMDB/main/Tmdb_host_ipv4".to_string(),
        "https://raw.githubusercontent.com/cnwikee/CheckTMDB/main/Tmdb_host_ipv6".to_string(),
    ]
}

fn default_probe_url() -> String {
    "https://api.github.com".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_event_channel_capacity() -> usize {
    64
}

fn default_enable() -> bool {
    true
}

fn default_update_hour() -> u8 {
    4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        RuntimeHostsConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_hour() {
        let mut config = RuntimeHostsConfig::default();
        config.schedule.update_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_http_url() {
        let mut config = RuntimeHostsConfig::default();
        config.refresh.primary_url = "ftp://mirror.example.com/hosts".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = RuntimeHostsConfig::default();
        config.refresh.fetch_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_custom_factory() {
        let mut config = RuntimeHostsConfig::default();
        config.source = SourceConfig::Custom {
            factory: String::new(),
            config: serde_json::json!({}),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn roundtrips_through_json() {
        let config = RuntimeHostsConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: RuntimeHostsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.refresh.primary_url, config.refresh.primary_url);
        assert_eq!(back.schedule.update_hour, 4);
    }
}
