//! Per-instruction write index.

use crate::vertex::VertexId;
use crate::FxIndexSet;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::hash::Hash;

/// Records which vertices each instruction writes directly.
///
/// The derived "written-to locations" set lives in the closure cache because
/// it depends on graph reachability.
#[derive(Debug)]
pub struct WriteRegistry<N> {
    index: IndexMap<N, FxIndexSet<VertexId>, FxBuildHasher>,
    /// Every `register_write` call, including ones that only went through a
    /// wildcard with no vertex and repeats of an existing pair.
    num_writes: usize,
}

impl<N> WriteRegistry<N>
where
    N: Eq + Hash,
{
    pub fn new() -> Self {
        WriteRegistry {
            index: IndexMap::default(),
            num_writes: 0,
        }
    }

    /// Count a write that has no vertex to attribute it to.
    pub fn count_untracked(&mut self) {
        self.num_writes += 1;
    }

    pub fn record(&mut self, instruction: N, vertex: VertexId) {
        self.num_writes += 1;
        self.index.entry(instruction).or_default().insert(vertex);
    }

    pub fn writes_to(&self, instruction: &N, vertex: VertexId) -> bool {
        self.index
            .get(instruction)
            .is_some_and(|written| written.contains(&vertex))
    }

    pub fn written_by(&self, instruction: &N) -> Option<&FxIndexSet<VertexId>> {
        self.index.get(instruction)
    }

    /// Every vertex written by any instruction, with repeats.
    pub fn written_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.index.values().flat_map(|written| written.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, &FxIndexSet<VertexId>)> {
        self.index.iter()
    }

    pub fn num_writes(&self) -> usize {
        self.num_writes
    }

    pub fn num_instructions(&self) -> usize {
        self.index.len()
    }
}

impl<N> Default for WriteRegistry<N>
where
    N: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
