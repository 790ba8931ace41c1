//! Project change notification contract.
//!
//! # Responsibility
//! - Define the sink the item tree reports structural changes to.
//! - Provide a flag-based sink for project owners and tests.
//!
//! # Invariants
//! - The tree calls `mark_changed` once per successful mutation and never
//!   reads project state back.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Receiver of "project changed" notifications.
pub trait ChangeSink {
    fn mark_changed(&self);
}

impl<F: Fn()> ChangeSink for F {
    fn mark_changed(&self) {
        self()
    }
}

/// Dirty flag for one open project.
#[derive(Debug, Default)]
pub struct ProjectChangeFlag {
    changed: AtomicBool,
    notifications: AtomicUsize,
}

impl ProjectChangeFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether any change was reported since the last reset.
    pub fn is_changed(&self) -> bool {
        self.changed.load(Ordering::Relaxed)
    }

    /// Total notifications received since creation.
    pub fn notifications(&self) -> usize {
        self.notifications.load(Ordering::Relaxed)
    }

    /// Clears the dirty flag, e.g. after the project was saved.
    pub fn reset(&self) {
        self.changed.store(false, Ordering::Relaxed);
    }
}

impl ChangeSink for ProjectChangeFlag {
    fn mark_changed(&self) {
        self.changed.store(true, Ordering::Relaxed);
        self.notifications.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeSink, ProjectChangeFlag};
    use std::cell::Cell;

    #[test]
    fn flag_counts_notifications_and_resets() {
        let flag = ProjectChangeFlag::new();
        assert!(!flag.is_changed());

        flag.mark_changed();
        flag.mark_changed();
        assert!(flag.is_changed());
        assert_eq!(flag.notifications(), 2);

        flag.reset();
        assert!(!flag.is_changed());
        assert_eq!(flag.notifications(), 2);
    }

    #[test]
    fn closures_act_as_sinks() {
        let calls = Cell::new(0);
        let sink = || calls.set(calls.get() + 1);
        sink.mark_changed();
        assert_eq!(calls.get(), 1);
    }
}
