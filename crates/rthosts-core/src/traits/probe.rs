// # Connectivity Probe Trait
//
// Defines the reachability gate between the two refresh phases.
//
// ## Implementations
//
// - HTTP HEAD (reqwest): `rthosts-http` crate
//
// ## Responsibilities
//
// A probe issues one lightweight request (HEAD semantics, no body transfer)
// per call. Failure is a value, not an error: any transport problem,
// timeout, or non-success status yields `false`. Probes never retry and
// never raise; gating decisions belong to the engine.

use async_trait::async_trait;
use std::time::Duration;

/// Trait for connectivity probe implementations
///
/// Implementations must be thread-safe and bounded by the given timeout.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Check whether `url` is reachable
    ///
    /// Returns `true` only on a successful response status.
    async fn probe(&self, url: &str, timeout: Duration) -> bool;
}

/// Helper trait for constructing probes from configuration
pub trait ProbeFactory: Send + Sync {
    /// Create a ConnectivityProbe instance from configuration
    fn create(
        &self,
        config: &crate::config::ProbeConfig,
    ) -> Result<Box<dyn ConnectivityProbe>, crate::Error>;
}
