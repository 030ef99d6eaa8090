//! Core traits for the runtime hosts system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`HostSource`]: Fetch a hosts-format document from a URL
//! - [`ConnectivityProbe`]: Lightweight reachability gate between refresh phases
//! - [`RefreshTrigger`]: Stream of scheduled fire events driving the pipeline

pub mod host_source;
pub mod probe;
pub mod trigger;

pub use host_source::{HostSource, HostSourceFactory};
pub use probe::{ConnectivityProbe, ProbeFactory};
pub use trigger::{RefreshTrigger, TriggerFire};
