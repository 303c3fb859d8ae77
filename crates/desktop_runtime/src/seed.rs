//! First-run seeding guard and outcomes.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use thiserror::Error;

use crate::vfs::FsError;

/// One-shot "seeding started" flag shared by every handle cloned from the same coordinator.
///
/// `try_start` is a compare-and-swap, so only the first caller proceeds even when several
/// continuations race.
#[derive(Debug, Clone, Default)]
pub struct SeedCoordinator {
    started: Arc<AtomicBool>,
}

impl SeedCoordinator {
    /// Claims the seeding slot. Returns `false` when another call already holds it.
    pub fn try_start(&self) -> bool {
        self.started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Releases the slot so a later call may retry.
    pub fn reset(&self) {
        self.started.store(false, Ordering::Release);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeedError {
    #[error("seed manifest fetch failed: {0}")]
    Fetch(String),
    #[error("seeding filesystem failed: {0}")]
    Filesystem(#[from] FsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Another call already claimed seeding.
    AlreadyStarted,
    /// The filesystem had content, so nothing was seeded.
    AlreadySeeded,
    Seeded {
        nodes: usize,
        icons: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Counts of what an incremental merge added.
pub struct MergeReport {
    pub nodes_added: usize,
    pub icons_added: usize,
}

impl MergeReport {
    pub fn is_empty(&self) -> bool {
        self.nodes_added == 0 && self.icons_added == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSync {
    /// The deployed build matches the stored one.
    Unchanged,
    /// A new build was detected and its manifest merged.
    Merged(MergeReport),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_start_succeeds_across_clones() {
        let coordinator = SeedCoordinator::default();
        let other = coordinator.clone();
        assert!(coordinator.try_start());
        assert!(!other.try_start());
        assert!(other.is_started());
    }

    #[test]
    fn reset_allows_retry() {
        let coordinator = SeedCoordinator::default();
        assert!(coordinator.try_start());
        coordinator.reset();
        assert!(!coordinator.is_started());
        assert!(coordinator.try_start());
    }
}
