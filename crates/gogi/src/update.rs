//! Update batching.
//!
//! Mutations are grouped into update scopes. Scopes nest; only the outermost
//! one triggers a flush when it ends, however many nodes were dirtied inside
//! it:
//!
//! ```text
//! Idle --begin--> Batching --end (depth 0)--> Flushing --> Idle
//! ```
//!
//! A flush runs style resolution, size negotiation and layout over the dirty
//! parts of the tree, hands the painter a new frame, then delivers the
//! signals queued while batching in the order they were emitted.
//!
//! Scopes are guard objects: [`Viewport::begin_update`] returns an
//! [`UpdateGuard`] that ends the scope when dropped, including on early
//! return.
//!
//! ```
//! use gogi::prelude::*;
//!
//! let mut vp = Viewport::new(Size::new(200.0, 100.0));
//! let root = vp.root();
//! {
//!     let mut batch = vp.begin_update();
//!     let a = batch.add_child(root, "Frame", "a").unwrap();
//!     batch.set_prop(a, StyleKey::Width, 40.0).unwrap();
//!     batch.set_prop(a, StyleKey::Height, 20.0).unwrap();
//! } // one flush here
//! let a = vp.tree().child_by_name(root, "a").unwrap();
//! assert_eq!(vp.geometry(a).unwrap().rect.width(), 40.0);
//! ```

use std::ops::{Deref, DerefMut};

use gogi_core::NodeId;

use crate::viewport::Viewport;

/// Where the update protocol currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateState {
    #[default]
    Idle,
    /// Inside at least one update scope.
    Batching,
    /// Running the flush pipeline.
    Flushing,
}

/// Counters accumulated over the viewport's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStats {
    pub flushes: usize,
    /// Flushes ended with [`UpdateGuard::end_no_signal`].
    pub silent_flushes: usize,
    pub restyled: usize,
    pub measured: usize,
    pub laid_out: usize,
    pub paints: usize,
    pub signals_dispatched: usize,
}

/// What one flush did. Also the payload of the root's
/// [`Updated`](gogi_core::SignalKind::Updated) signal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateReport {
    pub restyled: Vec<NodeId>,
    pub measured: Vec<NodeId>,
    pub laid_out: Vec<NodeId>,
    /// Containers whose children did not fit at their minimum sizes.
    pub overflowed: Vec<NodeId>,
    pub painted: bool,
    /// Passes run, including re-runs for mutations made by signal slots.
    pub rounds: usize,
}

impl UpdateReport {
    pub fn is_empty(&self) -> bool {
        self.restyled.is_empty() && self.measured.is_empty() && self.laid_out.is_empty()
    }
}

/// Scope depth bookkeeping.
#[derive(Debug, Default)]
pub(crate) struct UpdateTracker {
    depth: usize,
    state: UpdateState,
}

impl UpdateTracker {
    pub(crate) fn state(&self) -> UpdateState {
        self.state
    }

    /// Whether emitted signals should be queued rather than delivered.
    pub(crate) fn is_active(&self) -> bool {
        self.state != UpdateState::Idle
    }

    pub(crate) fn begin(&mut self) {
        self.depth += 1;
        if self.state == UpdateState::Idle {
            self.state = UpdateState::Batching;
        }
    }

    /// Close one scope. Returns `true` when the outermost scope closed and
    /// a flush should start.
    pub(crate) fn end(&mut self) -> bool {
        debug_assert!(self.depth > 0, "unbalanced end of update scope");
        self.depth = self.depth.saturating_sub(1);
        self.depth == 0 && self.state == UpdateState::Batching
    }

    pub(crate) fn start_flush(&mut self) {
        self.state = UpdateState::Flushing;
    }

    pub(crate) fn finish_flush(&mut self) {
        self.state = if self.depth > 0 {
            UpdateState::Batching
        } else {
            UpdateState::Idle
        };
    }
}

/// An open update scope.
///
/// Derefs to the [`Viewport`], so mutations go through the guard. Dropping
/// it ends the scope with a normal, signalling flush.
#[must_use = "the update scope ends as soon as the guard is dropped"]
pub struct UpdateGuard<'a> {
    viewport: &'a mut Viewport,
    signal: bool,
}

impl<'a> UpdateGuard<'a> {
    pub(crate) fn new(viewport: &'a mut Viewport) -> Self {
        viewport.updates_mut().begin();
        Self {
            viewport,
            signal: true,
        }
    }

    /// End the scope.
    pub fn end(self) {}

    /// End the scope without painting or delivering queued signals.
    ///
    /// Dirty state is still resolved. Queued signals stay queued until the
    /// next signalling flush, and that flush paints even if nothing else
    /// changed. Only use this when the changes have no observable effect.
    pub fn end_no_signal(mut self) {
        self.signal = false;
    }
}

impl Deref for UpdateGuard<'_> {
    type Target = Viewport;

    fn deref(&self) -> &Viewport {
        self.viewport
    }
}

impl DerefMut for UpdateGuard<'_> {
    fn deref_mut(&mut self) -> &mut Viewport {
        self.viewport
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.viewport.end_update(self.signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_nesting() {
        let mut tracker = UpdateTracker::default();
        assert_eq!(tracker.state(), UpdateState::Idle);
        assert!(!tracker.is_active());

        tracker.begin();
        tracker.begin();
        assert_eq!(tracker.state(), UpdateState::Batching);
        assert!(!tracker.end());
        assert!(tracker.end());

        tracker.start_flush();
        assert!(tracker.is_active());
        // Scopes opened by slots during a flush never start a second flush.
        tracker.begin();
        assert!(!tracker.end());
        tracker.finish_flush();
        assert_eq!(tracker.state(), UpdateState::Idle);
    }

    #[test]
    fn test_guard_flushes_once() {
        let mut vp = Viewport::new(gogi_core::Size::new(100.0, 100.0));
        let before = vp.stats().flushes;
        {
            let mut outer = vp.begin_update();
            let root = outer.root();
            {
                let mut inner = outer.begin_update();
                inner.add_child(root, "Frame", "a").unwrap();
                assert_eq!(inner.update_state(), UpdateState::Batching);
            }
            outer.add_child(root, "Frame", "b").unwrap();
        }
        assert_eq!(vp.stats().flushes, before + 1);
        assert_eq!(vp.update_state(), UpdateState::Idle);
    }
}
