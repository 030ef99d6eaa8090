//! Architectural Contract Test: Single-Flight Refresh
//!
//! This test verifies the concurrency cap of exactly one in-flight run:
//! a trigger arriving while a run is active coalesces into it instead of
//! queueing or erroring.
//!
//! If this test fails, overlapping refresh runs can race on activation.

mod common;

use common::*;
use rthosts_core::{ActiveOverrides, RefreshEngine, StopReason};
use std::sync::Arc;

#[tokio::test]
async fn overlapping_run_is_coalesced() {
    let source = ScriptedHostSource::new()
        .with_response(PRIMARY_URL, "140.82.112.3 github.com")
        .with_response(SECONDARY_V4_URL, "104.244.42.1 api.themoviedb.org")
        .with_response(SECONDARY_V6_URL, "");
    let gate = GatedProbe::new();
    let overrides = ActiveOverrides::new();

    let (engine, _event_rx) = RefreshEngine::new(
        Box::new(ScriptedHostSource::sharing_counters_with(&source)),
        Box::new(GatedProbe::sharing_gates_with(&gate)),
        overrides.clone(),
        minimal_refresh_config(),
    )
    .expect("engine construction succeeds");
    let engine = Arc::new(engine);

    // First run: parks inside the probe, holding the single-flight guard
    let first = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.refresh_once().await })
    };
    gate.entered
        .acquire()
        .await
        .expect("first run reaches the probe")
        .forget();

    // Second run while the first is parked: must coalesce immediately
    let second = engine.refresh_once().await;
    assert_eq!(second.stopped, Some(StopReason::AlreadyRunning));

    // Release the first run and let it finish all phases
    gate.release.add_permits(1);
    let first = first.await.expect("first run task joins");

    assert!(first.completed(), "parked run completes: {:?}", first);
    assert_eq!(overrides.len(), 2);

    // The coalesced call fetched nothing on its own
    assert_eq!(source.calls_to(PRIMARY_URL), 1);
}

#[tokio::test]
async fn sequential_runs_are_not_coalesced() {
    let source = ScriptedHostSource::new()
        .with_response(PRIMARY_URL, "140.82.112.3 github.com")
        .with_response(SECONDARY_V4_URL, "")
        .with_response(SECONDARY_V6_URL, "");
    let probe = FixedProbe::new(true);

    let (engine, _event_rx) = RefreshEngine::new(
        Box::new(ScriptedHostSource::sharing_counters_with(&source)),
        Box::new(probe),
        ActiveOverrides::new(),
        minimal_refresh_config(),
    )
    .expect("engine construction succeeds");

    assert!(engine.refresh_once().await.completed());
    assert!(engine.refresh_once().await.completed());

    assert_eq!(source.calls_to(PRIMARY_URL), 2);
}
