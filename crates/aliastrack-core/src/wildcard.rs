//! Wildcard values and the instructions that write through them.
//!
//! A wildcard may alias any memory location, tracked or not. Whether it also
//! has a vertex in the points-to graph is irrelevant to wildcard semantics.

use crate::FxIndexSet;
use std::hash::Hash;

#[derive(Debug)]
pub struct WildcardRegistry<V, N> {
    values: FxIndexSet<V>,
    writers: FxIndexSet<N>,
}

impl<V, N> WildcardRegistry<V, N>
where
    V: Eq + Hash,
    N: Eq + Hash,
{
    pub fn new() -> Self {
        WildcardRegistry {
            values: FxIndexSet::default(),
            writers: FxIndexSet::default(),
        }
    }

    /// Returns false if `value` was already a wildcard.
    pub fn insert(&mut self, value: V) -> bool {
        self.values.insert(value)
    }

    pub fn contains(&self, value: &V) -> bool {
        self.values.contains(value)
    }

    pub fn record_writer(&mut self, instruction: N) -> bool {
        self.writers.insert(instruction)
    }

    /// Wildcard values in the order they were registered.
    pub fn values(&self) -> &FxIndexSet<V> {
        &self.values
    }

    pub fn writers(&self) -> &FxIndexSet<N> {
        &self.writers
    }

    pub fn has_writers(&self) -> bool {
        !self.writers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<V, N> Default for WildcardRegistry<V, N>
where
    V: Eq + Hash,
    N: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
