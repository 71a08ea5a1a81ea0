//! A tracker that can be handed to several threads.
//!
//! Queries mutate the closure cache internally, so a reader lock would not
//! be sound. One exclusive lock guards the whole tracker for both mutation
//! and query.

use crate::config::TrackerConfig;
use crate::tracker::AliasTracker;
use crate::Identity;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
pub struct SharedAliasTracker<V, N> {
    inner: Arc<Mutex<AliasTracker<V, N>>>,
}

impl<V: Identity, N: Identity> SharedAliasTracker<V, N> {
    pub fn new(tracker: AliasTracker<V, N>) -> Self {
        SharedAliasTracker {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self::new(AliasTracker::with_config(config))
    }

    /// Run `f` with the tracker locked for the duration of the call.
    pub fn with<R>(&self, f: impl FnOnce(&AliasTracker<V, N>) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut AliasTracker<V, N>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Take the tracker back out if this is the last handle.
    pub fn try_unwrap(self) -> Result<AliasTracker<V, N>, Self> {
        Arc::try_unwrap(self.inner)
            .map(|mutex| mutex.into_inner())
            .map_err(|inner| SharedAliasTracker { inner })
    }
}

impl<V, N> Clone for SharedAliasTracker<V, N> {
    fn clone(&self) -> Self {
        SharedAliasTracker {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Identity, N: Identity> From<AliasTracker<V, N>> for SharedAliasTracker<V, N> {
    fn from(tracker: AliasTracker<V, N>) -> Self {
        Self::new(tracker)
    }
}
