//! Plugin-based transport registry
//!
//! The registry allows host sources and connectivity probes to be
//! registered dynamically at runtime, avoiding hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rthosts_core::registry::SourceRegistry;
//! use rthosts_core::config::SourceConfig;
//!
//! let registry = SourceRegistry::new();
//!
//! // Implementations register themselves during initialization:
//! rthosts_http::register(&registry);
//!
//! // Create a source from config
//! let config = SourceConfig::Http { user_agent: None };
//! let source = registry.create_source(&config)?;
//! ```

use crate::config::{ProbeConfig, SourceConfig};
use crate::error::{Error, Result};
use crate::traits::{ConnectivityProbe, HostSource, HostSourceFactory, ProbeFactory};
use std::collections::HashMap;
use std::sync::RwLock;

/// Registry for source and probe transport factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct SourceRegistry {
    /// Registered host source factories
    sources: RwLock<HashMap<String, Box<dyn HostSourceFactory>>>,

    /// Registered connectivity probe factories
    probes: RwLock<HashMap<String, Box<dyn ProbeFactory>>>,
}

impl SourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host source factory under a type name
    pub fn register_source(&self, name: impl Into<String>, factory: Box<dyn HostSourceFactory>) {
        let name = name.into();
        let mut sources = self.sources.write().unwrap();
        sources.insert(name, factory);
    }

    /// Register a connectivity probe factory under a type name
    pub fn register_probe(&self, name: impl Into<String>, factory: Box<dyn ProbeFactory>) {
        let name = name.into();
        let mut probes = self.probes.write().unwrap();
        probes.insert(name, factory);
    }

    /// Create a host source from configuration
    pub fn create_source(&self, config: &SourceConfig) -> Result<Box<dyn HostSource>> {
        let source_type = config.type_name();
        let sources = self.sources.read().unwrap();

        let factory = sources
            .get(source_type)
            .ok_or_else(|| Error::config(format!("Unknown source type: {}", source_type)))?;

        factory.create(config)
    }

    /// Create a connectivity probe from configuration
    pub fn create_probe(&self, config: &ProbeConfig) -> Result<Box<dyn ConnectivityProbe>> {
        let probe_type = config.type_name();
        let probes = self.probes.read().unwrap();

        let factory = probes
            .get(probe_type)
            .ok_or_else(|| Error::config(format!("Unknown probe type: {}", probe_type)))?;

        factory.create(config)
    }

    /// List all registered source types
    pub fn list_sources(&self) -> Vec<String> {
        let sources = self.sources.read().unwrap();
        sources.keys().cloned().collect()
    }

    /// List all registered probe types
    pub fn list_probes(&self) -> Vec<String> {
        let probes = self.probes.read().unwrap();
        probes.keys().cloned().collect()
    }

    /// Check if a source type is registered
    pub fn has_source(&self, name: &str) -> bool {
        let sources = self.sources.read().unwrap();
        sources.contains_key(name)
    }

    /// Check if a probe type is registered
    pub fn has_probe(&self, name: &str) -> bool {
        let probes = self.probes.read().unwrap();
        probes.contains_key(name)
    }
}
