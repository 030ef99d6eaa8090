// # Host Source Trait
//
// Defines the interface for retrieving a hosts-format document from a URL
// and parsing it into a HostTable.
//
// ## Implementations
//
// - HTTP (reqwest): `rthosts-http` crate
// - Test doubles with scripted responses live in the contract tests
//
// ## Responsibilities
//
// A source performs exactly one retrieval per `fetch` call. It must not:
//
// - retry or back off (the only retry mechanism is the next scheduled run,
//   owned by the schedule binding)
// - cache documents between calls
// - decide whether an empty result is a failure (owned by the engine)
// - touch the active override state
//
// A transport failure, timeout, or non-success status is reported as
// `Error::Fetch`; the engine logs it and continues with zero records from
// that source.

use async_trait::async_trait;
use std::time::Duration;

use crate::table::HostTable;

/// Trait for hosts-document source implementations
///
/// Implementations must be thread-safe and usable across async tasks. A
/// hang must be bounded by the given timeout, never open-ended.
#[async_trait]
pub trait HostSource: Send + Sync {
    /// Fetch the document at `url` and parse it into a table
    ///
    /// # Parameters
    ///
    /// - `url`: The source URL
    /// - `timeout`: Upper bound on the whole request
    ///
    /// # Returns
    ///
    /// - `Ok(HostTable)`: Parsed table, possibly empty (the caller decides
    ///   whether that is a failure)
    /// - `Err(Error)`: The document could not be retrieved
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<HostTable, crate::Error>;
}

/// Helper trait for constructing host sources from configuration
pub trait HostSourceFactory: Send + Sync {
    /// Create a HostSource instance from configuration
    fn create(
        &self,
        config: &crate::config::SourceConfig,
    ) -> Result<Box<dyn HostSource>, crate::Error>;
}
