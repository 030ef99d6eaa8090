//! Error types for the runtime hosts system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for runtime hosts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the runtime hosts system
#[derive(Error, Debug)]
pub enum Error {
    /// A hosts-format source could not be fetched (transport failure,
    /// timeout, or non-success status). Non-fatal: the engine treats the
    /// source as having yielded zero records.
    #[error("source fetch failed for {url}: {message}")]
    Fetch {
        /// Source URL that failed
        url: String,
        /// Underlying cause
        message: String,
    },

    /// The primary source yielded no usable records; the refresh run is
    /// abandoned until the next scheduled trigger.
    #[error("primary source returned no entries: {0}")]
    EmptyPrimary(String),

    /// Connectivity probe errors (only used when a probe implementation
    /// cannot even be constructed; probe outcomes themselves are booleans)
    #[error("connectivity probe error: {0}")]
    Probe(String),

    /// Resolution errors surfaced through the interception layer
    #[error("resolution error: {0}")]
    Resolve(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a fetch error for a given source URL
    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an empty-primary error
    pub fn empty_primary(msg: impl Into<String>) -> Self {
        Self::EmptyPrimary(msg.into())
    }

    /// Create a probe error
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Create a resolution error
    pub fn resolve(msg: impl Into<String>) -> Self {
        Self::Resolve(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
