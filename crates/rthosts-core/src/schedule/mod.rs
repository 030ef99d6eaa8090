//! Schedule binding
//!
//! Glue between the refresh engine and the scheduling capability: a
//! [`DailyTrigger`] that fires at a configured hour, and a
//! [`ScheduleBinding`] that registers the engine's entry point under a
//! stable job identity, runs it once immediately on enable, and tears the
//! registration down (restoring default resolution) on disable.
//!
//! ## Coalescing and concurrency
//!
//! The trigger stream only requests runs; the engine's single-flight guard
//! enforces the cap of one concurrent run, so a fire arriving while a run
//! is active collapses into it rather than queueing.

use crate::engine::RefreshEngine;
use crate::state::ActiveOverrides;
use crate::traits::{RefreshTrigger, TriggerFire};
use chrono::{DateTime, TimeZone, Utc};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info};

/// Stable job identity under which the recurring refresh is registered
pub const JOB_ID: &str = "runtime_hosts_daily";

/// Trigger that fires once a day at `hour:00` UTC
pub struct DailyTrigger {
    hour: u8,
}

impl DailyTrigger {
    /// Create a trigger firing daily at the given hour (0-23)
    pub fn new(hour: u8) -> Self {
        Self { hour }
    }
}

impl RefreshTrigger for DailyTrigger {
    fn triggers(&self) -> Pin<Box<dyn Stream<Item = TriggerFire> + Send + 'static>> {
        let (tx, rx) = mpsc::unbounded_channel();
        let hour = u32::from(self.hour);

        tokio::spawn(async move {
            debug!(hour, job = JOB_ID, "daily trigger task started");
            loop {
                let wait = until_next_fire(Utc::now(), hour);
                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        if tx.send(TriggerFire::new(JOB_ID)).is_err() {
                            break;
                        }
                    }
                    _ = tx.closed() => {
                        debug!(job = JOB_ID, "trigger stream dropped, stopping");
                        break;
                    }
                }
            }
        });

        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

/// Time remaining until the next `hour:00` UTC, always in the future
fn until_next_fire(now: DateTime<Utc>, hour: u32) -> Duration {
    let fire_today = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(now);

    let next = if fire_today > now {
        fire_today
    } else {
        fire_today + chrono::Duration::days(1)
    };

    (next - now).to_std().unwrap_or(Duration::from_secs(86_400))
}

/// Registers the refresh pipeline with the scheduling capability
///
/// ## Lifecycle
///
/// - [`enable`](Self::enable): run once immediately (awaited, so first-use
///   effects are visible), then consume a fresh trigger stream under
///   [`JOB_ID`]. Enabling again first discards the prior cycle, so
///   re-enable after disable reproduces enable exactly.
/// - [`disable`](Self::disable): deregister the job (a no-op when none is
///   registered) and clear the override state, restoring default
///   resolution. Idempotent.
pub struct ScheduleBinding {
    engine: Arc<RefreshEngine>,
    trigger: Box<dyn RefreshTrigger>,
    overrides: ActiveOverrides,
    job: Mutex<Option<JoinHandle<()>>>,
}

impl ScheduleBinding {
    /// Bind an engine to a trigger
    pub fn new(engine: Arc<RefreshEngine>, trigger: Box<dyn RefreshTrigger>) -> Self {
        let overrides = engine.overrides().clone();
        Self {
            engine,
            trigger,
            overrides,
            job: Mutex::new(None),
        }
    }

    /// Enable the feature: immediate refresh, then recurring registration
    pub async fn enable(&self) {
        // A fresh cycle: discard any registration left from a prior enable
        self.deregister();

        self.engine.refresh_once().await;

        let mut fires = self.trigger.triggers();
        let engine = Arc::clone(&self.engine);
        let task = tokio::spawn(async move {
            while let Some(fire) = fires.next().await {
                debug!(job = %fire.job_id, "scheduled refresh fired");
                engine.refresh_once().await;
            }
        });

        *self.job.lock().unwrap() = Some(task);
        info!(job = JOB_ID, "recurring refresh registered");
    }

    /// Disable the feature and restore default resolution
    pub fn disable(&self) {
        self.deregister();
        self.overrides.clear();
        info!(job = JOB_ID, "runtime hosts disabled, default resolution restored");
    }

    /// Whether a recurring registration is currently active
    pub fn is_enabled(&self) -> bool {
        self.job.lock().unwrap().is_some()
    }

    /// Drop the recurring registration if one exists
    fn deregister(&self) {
        if let Some(task) = self.job.lock().unwrap().take() {
            task.abort();
            debug!(job = JOB_ID, "recurring refresh deregistered");
        }
    }
}
