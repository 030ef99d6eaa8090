// # Active Override State
//
// Process-wide holder of the currently effective HostTable.
//
// ## Purpose
//
// Resolution callers on arbitrary threads consult this state on every
// lookup, while the refresh engine replaces its contents wholesale after a
// successful phase. The table is therefore kept behind an `Arc` that is
// swapped under a briefly-held lock: readers take a snapshot and never block
// on a refresh in progress.
//
// ## Lifecycle
//
// - Absent at startup (resolution falls through to the platform resolver)
// - Swapped atomically on each successful phase activation
// - Cleared on disable
// - Never partially visible mid-update

use std::sync::{Arc, RwLock};

use crate::table::{HostTable, OverrideEntry};

/// Cloneable handle to the currently active override table
///
/// All clones share the same underlying state. Installing a table replaces
/// the previous one in full; readers observe either the old or the new
/// table, never a mix.
#[derive(Debug, Clone, Default)]
pub struct ActiveOverrides {
    inner: Arc<RwLock<Option<Arc<HostTable>>>>,
}

impl ActiveOverrides {
    /// Create a handle with no table installed
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new table, replacing any previous one
    ///
    /// Idempotent in the sense required by activation: calling repeatedly
    /// with different tables is safe and the last call wins.
    pub fn install(&self, table: HostTable) {
        let table = Arc::new(table);
        let mut guard = self.inner.write().unwrap();
        *guard = Some(table);
    }

    /// Remove the installed table
    ///
    /// Subsequent lookups miss and resolution falls through to the default
    /// path. A no-op when nothing is installed.
    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap();
        *guard = None;
    }

    /// Snapshot of the installed table, if any
    pub fn snapshot(&self) -> Option<Arc<HostTable>> {
        self.inner.read().unwrap().clone()
    }

    /// Convenience lookup against the current snapshot
    pub fn lookup(&self, hostname: &str) -> Option<OverrideEntry> {
        self.snapshot()
            .and_then(|table| table.lookup(hostname).copied())
    }

    /// Number of entries in the installed table (0 when none)
    pub fn len(&self) -> usize {
        self.snapshot().map(|table| table.len()).unwrap_or(0)
    }

    /// Whether no table is installed or the installed table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
