//! Test doubles and common utilities for architecture contract tests
//!
//! This module provides minimal test doubles that verify architectural
//! constraints without touching the network.

use async_trait::async_trait;
use rthosts_core::config::RefreshConfig;
use rthosts_core::error::Result;
use rthosts_core::table::HostTable;
use rthosts_core::traits::{ConnectivityProbe, HostSource, RefreshTrigger, TriggerFire};
use rthosts_core::{Error, JOB_ID};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio_stream::Stream;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// A host source returning scripted documents per URL
///
/// URLs without a scripted response fail with a fetch error, which lets a
/// test simulate an unreachable source by simply not scripting it.
pub struct ScriptedHostSource {
    /// Canned documents keyed by URL
    responses: HashMap<String, String>,
    /// Recorded URLs from fetch calls
    fetched: Arc<Mutex<Vec<String>>>,
}

impl ScriptedHostSource {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fetched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script a document for a URL
    pub fn with_response(mut self, url: &str, document: &str) -> Self {
        self.responses.insert(url.to_string(), document.to_string());
        self
    }

    /// Total number of fetch calls
    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }

    /// Number of fetch calls for a specific URL
    pub fn calls_to(&self, url: &str) -> usize {
        self.fetched
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    /// Create a new ScriptedHostSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            responses: other.responses.clone(),
            fetched: Arc::clone(&other.fetched),
        }
    }
}

#[async_trait]
impl HostSource for ScriptedHostSource {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Result<HostTable> {
        self.fetched.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(document) => Ok(HostTable::parse(document)),
            None => Err(Error::fetch(url, "no scripted response")),
        }
    }
}

/// A probe that always answers the same and counts calls
pub struct FixedProbe {
    result: bool,
    calls: Arc<AtomicUsize>,
}

impl FixedProbe {
    pub fn new(result: bool) -> Self {
        Self {
            result,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of probe calls
    pub fn probe_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Create a new FixedProbe that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            result: other.result,
            calls: Arc::clone(&other.calls),
        }
    }
}

#[async_trait]
impl ConnectivityProbe for FixedProbe {
    async fn probe(&self, _url: &str, _timeout: Duration) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
    }
}

/// A probe that parks inside `probe` until the test releases it
///
/// Used to hold a refresh run open so overlap behavior can be observed
/// deterministically: the test waits on `entered`, then adds a permit to
/// `release` to let the run finish.
pub struct GatedProbe {
    pub entered: Arc<Semaphore>,
    pub release: Arc<Semaphore>,
}

impl GatedProbe {
    pub fn new() -> Self {
        Self {
            entered: Arc::new(Semaphore::new(0)),
            release: Arc::new(Semaphore::new(0)),
        }
    }

    pub fn sharing_gates_with(other: &Self) -> Self {
        Self {
            entered: Arc::clone(&other.entered),
            release: Arc::clone(&other.release),
        }
    }
}

#[async_trait]
impl ConnectivityProbe for GatedProbe {
    async fn probe(&self, _url: &str, _timeout: Duration) -> bool {
        self.entered.add_permits(1);
        if let Ok(permit) = self.release.acquire().await {
            permit.forget();
        }
        true
    }
}

/// A trigger fired manually by the test
///
/// Each `triggers` call produces a fresh stream; `fire` sends on the most
/// recently produced one.
#[derive(Clone)]
pub struct ManualTrigger {
    tx: Arc<Mutex<Option<mpsc::UnboundedSender<TriggerFire>>>>,
}

impl ManualTrigger {
    pub fn new() -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
        }
    }

    /// Fire the trigger; false when no live stream is listening
    pub fn fire(&self) -> bool {
        match &*self.tx.lock().unwrap() {
            Some(tx) => tx.send(TriggerFire::new(JOB_ID)).is_ok(),
            None => false,
        }
    }
}

impl RefreshTrigger for ManualTrigger {
    fn triggers(&self) -> Pin<Box<dyn Stream<Item = TriggerFire> + Send + 'static>> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.tx.lock().unwrap() = Some(tx);
        Box::pin(UnboundedReceiverStream::new(rx))
    }
}

/// Canned source URLs used across the contract tests
pub const PRIMARY_URL: &str = "https://primary.test/hosts";
pub const SECONDARY_V4_URL: &str = "https://secondary.test/hosts_ipv4";
pub const SECONDARY_V6_URL: &str = "https://secondary.test/hosts_ipv6";
pub const PROBE_URL: &str = "https://probe.test/";

/// Helper to create a minimal RefreshConfig for testing
pub fn minimal_refresh_config() -> RefreshConfig {
    RefreshConfig {
        primary_url: PRIMARY_URL.to_string(),
        secondary_urls: vec![
            SECONDARY_V4_URL.to_string(),
            SECONDARY_V6_URL.to_string(),
        ],
        probe_url: PROBE_URL.to_string(),
        fetch_timeout_secs: 1,
        probe_timeout_secs: 1,
        event_channel_capacity: 64,
    }
}
