// # Resolution Interception
//
// The process-wide override point through which all outbound name
// resolution passes before falling back to the platform resolver.
//
// ## Architecture
//
// The interception point is a single swappable strategy object rather than
// a mutated global function pointer: an [`OverrideResolver`] holds the
// active override table and a fallback [`Resolve`] implementation captured
// once at construction. Installing a new table swaps the table only; the
// indirection layer itself never changes. Repeated install/uninstall cycles
// therefore cannot stack wrapper layers, and uninstalling restores exactly
// the original delegation path.
//
// ## Concurrency
//
// `resolve` may be called from arbitrary tasks at any time, including
// during a table swap. A caller observes either the fully-old or the
// fully-new table, never a partially merged one (the table is an immutable
// snapshot behind an `Arc` swap).

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::debug;

use crate::Result;
use crate::state::ActiveOverrides;
use crate::table::HostTable;

/// Trait for name-resolution strategies
///
/// All networking code in the process is expected to route `(hostname,
/// port)` resolution through an implementation of this trait, normally the
/// process-wide instance returned by [`global`].
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Resolve a hostname and port to socket addresses
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>>;
}

/// Platform resolver backed by `tokio::net::lookup_host`
#[derive(Debug, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Create a new platform resolver
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Resolve for SystemResolver {
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        Ok(addrs.collect())
    }
}

/// Resolution strategy that consults the active override table first
///
/// On a hit the resolved address is synthesized from the override entry
/// without contacting any network resolver; on a miss the call delegates to
/// the fallback captured at construction and returns its result unmodified.
pub struct OverrideResolver {
    overrides: ActiveOverrides,
    fallback: Arc<dyn Resolve>,
}

impl OverrideResolver {
    /// Create a resolver over the given override state and fallback
    pub fn new(overrides: ActiveOverrides, fallback: Arc<dyn Resolve>) -> Self {
        Self {
            overrides,
            fallback,
        }
    }

    /// Handle to the override state consulted by this resolver
    pub fn overrides(&self) -> &ActiveOverrides {
        &self.overrides
    }

    /// Swap in a new override table (last call wins, no wrapper stacking)
    pub fn install(&self, table: HostTable) {
        let entries = table.len();
        self.overrides.install(table);
        debug!(entries, "override table installed");
    }

    /// Remove the override table, restoring pure fallback resolution
    ///
    /// Safe to call repeatedly; a second call is a no-op with the same end
    /// state.
    pub fn uninstall(&self) {
        self.overrides.clear();
        debug!("override table removed, default resolution restored");
    }
}

#[async_trait]
impl Resolve for OverrideResolver {
    async fn resolve(&self, host: &str, port: u16) -> Result<Vec<SocketAddr>> {
        if let Some(entry) = self.overrides.lookup(host) {
            debug!(host, ip = %entry.ip, "resolved via runtime hosts override");
            return Ok(vec![SocketAddr::new(entry.ip, port)]);
        }
        self.fallback.resolve(host, port).await
    }
}

static GLOBAL: OnceLock<OverrideResolver> = OnceLock::new();

/// The process-wide resolver instance
///
/// Lazily initialized on first use with a [`SystemResolver`] fallback; the
/// fallback is captured exactly once for the lifetime of the process.
pub fn global() -> &'static OverrideResolver {
    GLOBAL.get_or_init(|| {
        OverrideResolver::new(ActiveOverrides::new(), Arc::new(SystemResolver::new()))
    })
}

/// Resolve through the process-wide instance
pub async fn resolve(host: &str, port: u16) -> Result<Vec<SocketAddr>> {
    global().resolve(host, port).await
}
