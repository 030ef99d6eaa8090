// # rthosts-core
//
// Core library for the runtime hosts override engine.
//
// ## Architecture Overview
//
// This library maintains an in-process name-resolution override table that
// redirects specific hostnames to operator-chosen addresses, refreshed on a
// schedule from remote hosts-format sources:
//
// - **HostTable**: ordered hostname → address mapping with parse/merge/lookup
// - **HostSource**: trait for fetching a hosts-format document from a URL
// - **ConnectivityProbe**: trait for the lightweight reachability gate
// - **RefreshEngine**: the two-phase fetch → activate → probe → merge pipeline
// - **ActiveOverrides / resolver**: the process-wide resolution interception
//   point, consulted by all outbound name resolution
// - **ScheduleBinding**: registers the refresh pipeline under a stable job
//   identity and drives it from a trigger stream
// - **SourceRegistry**: plugin-based registry for source/probe transports
//
// ## Design Principles
//
// 1. **Separation of Concerns**: transports implement one request per call;
//    retry policy (next scheduled run) and phase gating live in the engine
// 2. **Failure degrades, never crashes**: every pipeline failure ends in a
//    logged reason and a clean return to idle
// 3. **Atomic activation**: resolution readers see either the old table or
//    the new table in full, never a partial merge
// 4. **Library-First**: the daemon is a thin wrapper; everything here can be
//    embedded directly

pub mod table;
pub mod traits;
pub mod engine;
pub mod resolver;
pub mod schedule;
pub mod registry;
pub mod config;
pub mod error;
pub mod state;

// Re-export core types for convenience
pub use table::{AddressFamily, HostTable, OverrideEntry};
pub use traits::{ConnectivityProbe, HostSource, RefreshTrigger};
pub use engine::{EngineEvent, RefreshEngine, RefreshOutcome, StopReason};
pub use resolver::{OverrideResolver, Resolve, SystemResolver};
pub use schedule::{DailyTrigger, ScheduleBinding, JOB_ID};
pub use registry::SourceRegistry;
pub use config::{ProbeConfig, RefreshConfig, RuntimeHostsConfig, ScheduleConfig, SourceConfig};
pub use error::{Error, Result};
pub use state::ActiveOverrides;
