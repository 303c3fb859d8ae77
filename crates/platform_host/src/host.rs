//! Shared host-bundle model injected into the desktop runtime.

use std::rc::Rc;

use crate::{KeyValueStore, MemoryKeyValueStore, NoopSeedSource, SeedSource};

/// Stable host strategy selected for the current build/runtime composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed composition (`localStorage` + `fetch`).
    Browser,
    /// In-memory composition used off-browser and in tests.
    Memory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Memory => "memory",
        }
    }
}

/// Runtime-selected host service bundle injected into the desktop runtime.
///
/// Environment-specific service selection happens before this bundle crosses into
/// `desktop_runtime`, which keeps the runtime decoupled from browser adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Key-value store holding the filesystem and session blobs.
    pub storage: Rc<dyn KeyValueStore>,
    /// Source of the seed manifest and deployed version descriptor.
    pub seed: Rc<dyn SeedSource>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds an in-memory bundle around `seed`.
    pub fn in_memory(seed: Rc<dyn SeedSource>) -> Self {
        Self {
            storage: Rc::new(MemoryKeyValueStore::default()),
            seed,
            host_strategy: HostStrategy::Memory,
        }
    }
}

impl Default for HostServices {
    fn default() -> Self {
        Self::in_memory(Rc::new(NoopSeedSource))
    }
}
