// # Refresh Trigger Trait
//
// Defines the interface between the schedule binding and whatever decides
// when a refresh run should happen.
//
// ## Implementations
//
// - Daily at a configured hour: `schedule::DailyTrigger`
// - Manually fired doubles live in the contract tests
//
// ## Usage
//
// ```rust,ignore
// use rthosts_core::traits::RefreshTrigger;
// use tokio_stream::StreamExt;
//
// let trigger = /* RefreshTrigger implementation */;
// let mut fires = trigger.triggers();
// while let Some(fire) = fires.next().await {
//     println!("fired: {}", fire.job_id);
// }
// ```

use std::pin::Pin;
use tokio_stream::Stream;

/// A single scheduled fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerFire {
    /// Stable identity of the job that fired
    pub job_id: String,
}

impl TriggerFire {
    /// Create a fire event for a job
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

/// Trait for refresh trigger implementations
///
/// # Behavior
///
/// - Each `triggers` call returns a fresh, independent stream (the binding
///   calls it once per enable cycle)
/// - The stream yields one item per scheduled fire and never terminates
///   under normal conditions
/// - Must be cancellation-safe: dropping the stream stops any underlying
///   task
pub trait RefreshTrigger: Send + Sync {
    /// Stream of fire events
    fn triggers(&self) -> Pin<Box<dyn Stream<Item = TriggerFire> + Send + 'static>>;
}
