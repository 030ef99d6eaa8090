//! Refresh orchestrator
//!
//! The RefreshEngine drives the two-phase refresh pipeline:
//! - Fetching the primary hosts source
//! - Activating it immediately via the override state
//! - Gating on a connectivity probe
//! - Fetching and merging the secondary sources
//! - Activating the merged table
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐   trigger   ┌───────────────┐
//! │ScheduleBinding│────────────▶│ RefreshEngine │
//! └───────────────┘             └───────────────┘
//!                                       │
//!          ┌────────────────────────────┼────────────────────────────┐
//!          │                            │                            │
//!          ▼                            ▼                            ▼
//!  ┌──────────────┐           ┌─────────────────┐          ┌─────────────────┐
//!  │  HostSource  │           │ConnectivityProbe│          │ ActiveOverrides │
//!  │ (fetch docs) │           │     (gate)      │          │   (activate)    │
//!  └──────────────┘           └─────────────────┘          └─────────────────┘
//! ```
//!
//! ## Pipeline states
//!
//! Idle → FetchingPrimary → ProbingConnectivity → FetchingSecondary →
//! Activated, with early exits back to idle on an empty primary or a failed
//! probe. An early exit after primary activation keeps the primary table
//! active (phase 1 already improved resolvability; there is no rollback).
//!
//! ## Failure model
//!
//! `refresh_once` never returns an error: every failure path ends in a
//! logged reason and a clean return. There is no retry or backoff within a
//! run; the next scheduled trigger is the retry mechanism.

use crate::config::RefreshConfig;
use crate::state::ActiveOverrides;
use crate::table::HostTable;
use crate::traits::{ConnectivityProbe, HostSource};
use std::fmt;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error, info, warn};

/// Why a refresh run stopped before completing all phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Another run was already in flight; this trigger was coalesced
    AlreadyRunning,
    /// The primary source yielded no entries; nothing was activated
    EmptyPrimary,
    /// The connectivity gate failed; the primary table stays active
    ProbeFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::AlreadyRunning => write!(f, "refresh already in flight"),
            StopReason::EmptyPrimary => write!(f, "primary source empty"),
            StopReason::ProbeFailed => {
                write!(f, "connectivity check failed after primary activation")
            }
        }
    }
}

/// Per-run record of what a refresh accomplished
///
/// Transient: used for logging and tests only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Entries loaded from the primary source
    pub primary_entries: usize,
    /// Entries merged across all secondary sources
    pub secondary_entries: usize,
    /// Entries in the active table when the run ended
    pub active_entries: usize,
    /// Why the run stopped early, if it did
    pub stopped: Option<StopReason>,
}

impl RefreshOutcome {
    /// Whether every phase completed
    pub fn completed(&self) -> bool {
        self.stopped.is_none()
    }
}

/// Events emitted by the RefreshEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A refresh run started
    RefreshStarted,

    /// A source document was fetched and parsed
    SourceLoaded { url: String, entries: usize },

    /// A source fetch failed (treated as zero records)
    SourceFailed { url: String, error: String },

    /// The primary table was activated
    PrimaryActivated { entries: usize },

    /// The connectivity gate did not pass
    ProbeFailed { url: String },

    /// All phases completed and the merged table is active
    RefreshCompleted { total_entries: usize },

    /// The run was abandoned before any activation
    RefreshAborted { reason: StopReason },
}

/// Refresh pipeline orchestrator
///
/// ## Lifecycle
///
/// 1. Create with [`RefreshEngine::new()`]
/// 2. Drive with [`RefreshEngine::refresh_once()`], normally from a
///    [`crate::ScheduleBinding`]
///
/// ## Threading
///
/// At most one run is in flight at a time: a `refresh_once` call that finds
/// a run already active returns immediately with
/// [`StopReason::AlreadyRunning`] instead of queueing (trigger coalescing).
/// Resolution readers are never blocked by a run in progress.
pub struct RefreshEngine {
    /// Source used for primary and secondary fetches
    source: Box<dyn HostSource>,

    /// Reachability gate between the two phases
    probe: Box<dyn ConnectivityProbe>,

    /// Override state activated by the pipeline
    overrides: ActiveOverrides,

    /// Pipeline parameters
    config: RefreshConfig,

    /// Single-flight guard enforcing the concurrency cap of one
    run_guard: Mutex<()>,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl RefreshEngine {
    /// Create a new refresh engine
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields
    /// engine events for logging/observability.
    pub fn new(
        source: Box<dyn HostSource>,
        probe: Box<dyn ConnectivityProbe>,
        overrides: ActiveOverrides,
        config: RefreshConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), crate::Error> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.event_channel_capacity);

        let engine = Self {
            source,
            probe,
            overrides,
            config,
            run_guard: Mutex::new(()),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// Handle to the override state this engine activates into
    pub fn overrides(&self) -> &ActiveOverrides {
        &self.overrides
    }

    /// Run the full refresh pipeline once
    ///
    /// Returns the per-run outcome; never errors. A call arriving while
    /// another run is in flight coalesces into it and reports
    /// [`StopReason::AlreadyRunning`].
    pub async fn refresh_once(&self) -> RefreshOutcome {
        let Ok(_guard) = self.run_guard.try_lock() else {
            debug!("refresh already in flight, coalescing trigger");
            return RefreshOutcome {
                primary_entries: 0,
                secondary_entries: 0,
                active_entries: self.overrides.len(),
                stopped: Some(StopReason::AlreadyRunning),
            };
        };

        self.emit_event(EngineEvent::RefreshStarted);
        info!(url = %self.config.primary_url, "starting runtime hosts refresh");

        // Phase 1: primary source gates the whole run
        let primary = self.load_source(&self.config.primary_url).await;
        if primary.is_empty() {
            error!(
                url = %self.config.primary_url,
                "primary source returned no entries, abandoning run"
            );
            self.emit_event(EngineEvent::RefreshAborted {
                reason: StopReason::EmptyPrimary,
            });
            return RefreshOutcome {
                primary_entries: 0,
                secondary_entries: 0,
                active_entries: self.overrides.len(),
                stopped: Some(StopReason::EmptyPrimary),
            };
        }
        let primary_entries = primary.len();

        // Activate immediately so resolution benefits even if later phases fail
        self.overrides.install(primary.clone());
        self.emit_event(EngineEvent::PrimaryActivated {
            entries: primary_entries,
        });
        info!(entries = primary_entries, "primary table activated");

        // Connectivity gate between the phases
        let probe_timeout = Duration::from_secs(self.config.probe_timeout_secs);
        if !self.probe.probe(&self.config.probe_url, probe_timeout).await {
            warn!(
                url = %self.config.probe_url,
                "connectivity check failed after primary activation, keeping primary table"
            );
            self.emit_event(EngineEvent::ProbeFailed {
                url: self.config.probe_url.clone(),
            });
            return RefreshOutcome {
                primary_entries,
                secondary_entries: 0,
                active_entries: primary_entries,
                stopped: Some(StopReason::ProbeFailed),
            };
        }
        debug!(url = %self.config.probe_url, "connectivity check passed");

        // Phase 2: secondary sources, merged in listed order (later wins)
        let mut secondary = HostTable::new();
        for url in &self.config.secondary_urls {
            let table = self.load_source(url).await;
            secondary = HostTable::merge(&secondary, &table);
        }
        let secondary_entries = secondary.len();

        // Secondary wins over primary on key collision
        let merged = HostTable::merge(&primary, &secondary);
        let total = merged.len();
        self.overrides.install(merged);
        self.emit_event(EngineEvent::RefreshCompleted {
            total_entries: total,
        });
        info!(
            primary = primary_entries,
            secondary = secondary_entries,
            total,
            "runtime hosts refresh complete"
        );

        RefreshOutcome {
            primary_entries,
            secondary_entries,
            active_entries: total,
            stopped: None,
        }
    }

    /// Fetch one source, degrading any failure to an empty table
    async fn load_source(&self, url: &str) -> HostTable {
        let timeout = Duration::from_secs(self.config.fetch_timeout_secs);
        match self.source.fetch(url, timeout).await {
            Ok(table) => {
                debug!(url, entries = table.len(), "source loaded");
                self.emit_event(EngineEvent::SourceLoaded {
                    url: url.to_string(),
                    entries: table.len(),
                });
                table
            }
            Err(e) => {
                error!(url, error = %e, "source fetch failed, treating as zero records");
                self.emit_event(EngineEvent::SourceFailed {
                    url: url.to_string(),
                    error: e.to_string(),
                });
                HostTable::new()
            }
        }
    }

    /// Emit an engine event
    fn emit_event(&self, event: EngineEvent) {
        // Drop on full so a slow consumer cannot stall the pipeline
        if self.event_tx.try_send(event).is_err() {
            warn!("event channel full, dropping engine event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_reasons_render_for_logs() {
        assert_eq!(StopReason::EmptyPrimary.to_string(), "primary source empty");
        assert_eq!(
            StopReason::ProbeFailed.to_string(),
            "connectivity check failed after primary activation"
        );
    }

    #[test]
    fn outcome_completed_tracks_stop_reason() {
        let done = RefreshOutcome {
            primary_entries: 2,
            secondary_entries: 1,
            active_entries: 3,
            stopped: None,
        };
        assert!(done.completed());

        let halted = RefreshOutcome {
            stopped: Some(StopReason::ProbeFailed),
            ..done
        };
        assert!(!halted.completed());
    }
}
