//! Mutation logs that can be replayed into a fresh tracker.
//!
//! Tests use these to compare a tracker that was queried between mutations
//! against one rebuilt from the same log with no cache history.

use aliastrack_core::{AliasTracker, Identity};

/// One construction-phase call on a tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op<V, N> {
    Fresh(V),
    PointTo(V, V),
    Wildcard(V),
    Write(V, N),
}

impl<V: Identity, N: Identity> Op<V, N> {
    /// Apply the operation, ignoring usage errors.
    ///
    /// Returns true if the tracker accepted it.
    pub fn apply(&self, tracker: &mut AliasTracker<V, N>) -> bool {
        match self {
            Op::Fresh(value) => tracker.make_fresh_value(value.clone()).is_ok(),
            Op::PointTo(value, target) => {
                tracker.make_pointer_to(value.clone(), target.clone());
                true
            }
            Op::Wildcard(value) => {
                tracker.set_wildcard(value.clone());
                true
            }
            Op::Write(value, instruction) => tracker
                .register_write(value.clone(), instruction.clone())
                .is_ok(),
        }
    }
}

/// Build a tracker by applying every operation in order.
pub fn replay<V: Identity, N: Identity>(ops: &[Op<V, N>]) -> AliasTracker<V, N> {
    let mut tracker = AliasTracker::new();
    for op in ops {
        op.apply(&mut tracker);
    }
    tracker
}
