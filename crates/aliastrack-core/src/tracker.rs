//! The alias tracker: construction API plus the cached alias queries.

use crate::cache::ClosureCache;
use crate::config::TrackerConfig;
use crate::error::{AliasError, Result};
use crate::graph::PointsToGraph;
use crate::vertex::VertexId;
use crate::wildcard::WildcardRegistry;
use crate::writes::WriteRegistry;
use crate::{FxIndexSet, Identity};
use rustc_hash::FxHashSet;
use std::cell::{RefCell, RefMut};
use tracing::debug;

/// Tracks the "`a` may point to `b`" graph for a set of values, together with
/// wildcards and writes.
///
/// `V` identifies IR values and `N` identifies instructions. The tracker only
/// ever compares and hashes them.
///
/// Queries take `&self` but lazily rebuild cached closures after any
/// mutation. The tracker is single-threaded; wrap it in a
/// [`SharedAliasTracker`](crate::SharedAliasTracker) to share it.
#[derive(Debug)]
pub struct AliasTracker<V, N> {
    config: TrackerConfig,
    pub(crate) graph: PointsToGraph<V>,
    pub(crate) wildcards: WildcardRegistry<V, N>,
    pub(crate) writes: WriteRegistry<N>,
    cache: RefCell<ClosureCache>,
}

/// Size counters for a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct TrackerStats {
    pub vertices: usize,
    pub edges: usize,
    pub wildcards: usize,
    pub writes: usize,
    pub wildcard_writers: usize,
    pub cache_rebuilds: usize,
}

impl<V: Identity, N: Identity> AliasTracker<V, N> {
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        AliasTracker {
            graph: PointsToGraph::with_capacity(config.vertex_capacity),
            wildcards: WildcardRegistry::new(),
            writes: WriteRegistry::new(),
            cache: RefCell::new(ClosureCache::new()),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Returns true iff `value` has a vertex.
    pub fn contains(&self, value: &V) -> bool {
        self.graph.vertices().contains(value)
    }

    /// Give `value` a fresh location that does not point anywhere.
    ///
    /// Registering the same value twice is a usage error.
    pub fn make_fresh_value(&mut self, value: V) -> Result<VertexId> {
        match self.graph.vertices_mut().insert_new(value.clone()) {
            Some(id) => {
                self.invalidate();
                Ok(id)
            }
            None => {
                debug!(?value, "rejected fresh registration of a tracked value");
                Err(AliasError::already_registered(&value))
            }
        }
    }

    /// Make `value` point at `target`, registering either one if needed.
    ///
    /// A value may point at several targets; the union over all of them is
    /// kept.
    pub fn make_pointer_to(&mut self, value: V, target: V) {
        let vertices = self.graph.vertices_mut();
        let from = vertices.get_or_insert(value);
        let to = vertices.get_or_insert(target);
        if self.graph.add_edge(from, to) {
            self.invalidate();
        }
    }

    /// Mark `value` as possibly aliasing any memory location.
    pub fn set_wildcard(&mut self, value: V) {
        if self.wildcards.insert(value.clone()) {
            debug!(?value, tracked = self.contains(&value), "registered wildcard");
            self.invalidate();
        }
    }

    pub fn is_wildcard(&self, value: &V) -> bool {
        self.wildcards.contains(value)
    }

    /// Record that `instruction` writes to `value`.
    ///
    /// Writes through a wildcard also make `instruction` a wildcard writer.
    /// A value that is neither tracked nor a wildcard is rejected.
    pub fn register_write(&mut self, value: V, instruction: N) -> Result<()> {
        let vertex = self.graph.vertices().lookup(&value);
        let wildcard = self.wildcards.contains(&value);
        if vertex.is_none() && !wildcard {
            debug!(?value, ?instruction, "write through an untracked value");
            return Err(AliasError::unknown_value(&value));
        }

        if wildcard {
            self.wildcards.record_writer(instruction.clone());
        }
        match vertex {
            Some(id) => self.writes.record(instruction, id),
            None => self.writes.count_untracked(),
        }
        self.invalidate();
        Ok(())
    }

    /// Does `instruction` write to `value` directly? Aliases are not
    /// considered.
    pub fn writes_to(&self, instruction: &N, value: &V) -> bool {
        self.graph
            .vertices()
            .lookup(value)
            .is_some_and(|id| self.writes.writes_to(instruction, id))
    }

    /// Values written directly by `instruction`.
    pub fn writes_of<'a>(&'a self, instruction: &N) -> impl Iterator<Item = &'a V> + 'a {
        let vertices = self.graph.vertices();
        self.writes
            .written_by(instruction)
            .into_iter()
            .flatten()
            .map(move |&id| vertices.value_of(id))
    }

    /// Total number of registered writes, including repeats and writes
    /// through untracked wildcards.
    pub fn num_writes(&self) -> usize {
        self.writes.num_writes()
    }

    /// Instructions that write through a wildcard.
    pub fn wildcard_writers(&self) -> &FxIndexSet<N> {
        self.wildcards.writers()
    }

    /// Do `a` and `b` potentially share a memory location?
    pub fn may_alias(&self, a: &V, b: &V) -> bool {
        if self.is_wildcard(a) || self.is_wildcard(b) {
            return true;
        }
        let (Some(ia), Some(ib)) = (self.vertex(a), self.vertex(b)) else {
            return false;
        };
        self.cache().closures_intersect(&self.graph, ia, ib)
    }

    /// Does any value of `group_a` potentially share a memory location with
    /// any value of `group_b`?
    ///
    /// Either group may contain repeated values. An empty group aliases
    /// nothing, even if the other group contains a wildcard.
    pub fn may_alias_groups<'v, A, B>(&self, group_a: A, group_b: B) -> bool
    where
        A: IntoIterator<Item = &'v V>,
        B: IntoIterator<Item = &'v V>,
        V: 'v,
    {
        let mut group_a = group_a.into_iter().peekable();
        let mut group_b = group_b.into_iter().peekable();
        if group_a.peek().is_none() || group_b.peek().is_none() {
            return false;
        }

        let mut cache = self.cache();
        let mut seen: FxHashSet<&V> = FxHashSet::default();

        // Record every memory location of group `a`.
        let mut locations: FxHashSet<VertexId> = FxHashSet::default();
        for value in group_a {
            if self.config.dedup_group_members && !seen.insert(value) {
                continue;
            }
            if self.is_wildcard(value) {
                return true;
            }
            if let Some(id) = self.vertex(value) {
                locations.extend(cache.closure(&self.graph, id).iter().copied());
            }
        }

        seen.clear();
        for value in group_b {
            if self.config.dedup_group_members && !seen.insert(value) {
                continue;
            }
            if self.is_wildcard(value) {
                return true;
            }
            if let Some(id) = self.vertex(value) {
                if !cache.closure(&self.graph, id).is_disjoint(&locations) {
                    return true;
                }
            }
        }
        false
    }

    /// Does anything write to the memory locations `value` may point to?
    ///
    /// Conservative rule, in order:
    /// 1. some written vertex's closure overlaps `value`'s closure;
    /// 2. a write went through a wildcard, and `value`'s closure overlaps
    ///    what some wildcard's vertex reaches;
    /// 3. `value` is a wildcard and any write exists at all.
    ///
    /// A value that is neither tracked nor a wildcard has no writers.
    pub fn has_writers(&self, value: &V) -> bool {
        let wildcard = self.is_wildcard(value);
        if wildcard && self.writes.num_writes() > 0 {
            return true;
        }
        let Some(id) = self.vertex(value) else {
            return false;
        };

        let mut cache = self.cache();
        if self.wildcards.has_writers()
            && cache.overlaps_wildcard_reachable(&self.graph, id)
        {
            return true;
        }
        cache.overlaps_written(&self.graph, id)
    }

    /// Every other value that may represent the same memory location as
    /// `value`: its connected component in the points-to graph, ignoring edge
    /// direction.
    ///
    /// Wildcards are not considered.
    pub fn get_aliases(&self, value: &V) -> FxHashSet<V> {
        let Some(id) = self.vertex(value) else {
            return FxHashSet::default();
        };
        let mut cache = self.cache();
        let vertices = self.graph.vertices();
        cache
            .components(&self.graph)
            .members_of(id)
            .iter()
            .filter(|&&member| member != id)
            .map(|&member| vertices.value_of(member).clone())
            .collect()
    }

    /// The values in `value`'s memory-location closure, `value` included.
    pub fn memory_locations(&self, value: &V) -> FxHashSet<V> {
        let Some(id) = self.vertex(value) else {
            return FxHashSet::default();
        };
        let mut cache = self.cache();
        let vertices = self.graph.vertices();
        cache
            .closure(&self.graph, id)
            .iter()
            .map(|&member| vertices.value_of(member).clone())
            .collect()
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            vertices: self.graph.vertices().len(),
            edges: self.graph.edge_count(),
            wildcards: self.wildcards.len(),
            writes: self.writes.num_writes(),
            wildcard_writers: self.wildcards.writers().len(),
            cache_rebuilds: self.cache.borrow().rebuilds(),
        }
    }

    /// Abort if the graph's edge views disagree.
    pub fn verify_invariants(&self) {
        self.graph.verify_invariants();
    }

    fn vertex(&self, value: &V) -> Option<VertexId> {
        self.graph.vertices().lookup(value)
    }

    fn invalidate(&mut self) {
        self.cache.get_mut().invalidate();
    }

    /// Borrow the cache, rebuilding it first if a mutation made it stale.
    fn cache(&self) -> RefMut<'_, ClosureCache> {
        let mut cache = self.cache.borrow_mut();
        cache.refresh(
            &self.graph,
            &self.writes,
            &self.wildcards,
            self.config.verify_on_rebuild,
        );
        cache
    }
}

impl<V: Identity, N: Identity> Default for AliasTracker<V, N> {
    fn default() -> Self {
        Self::new()
    }
}
