//! Memoized closures over the points-to graph.
//!
//! Everything here is derived state. A single staleness flag covers all of
//! it: any mutation of the graph, the wildcard set, or the write index marks
//! the cache stale, and the next query throws every memo away and starts
//! over. There is no incremental maintenance.

use crate::graph::{BfsDirection, PointsToGraph};
use crate::vertex::VertexId;
use crate::wildcard::WildcardRegistry;
use crate::writes::WriteRegistry;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;
use tracing::{debug, trace};

#[derive(Debug)]
pub struct ClosureCache {
    stale: bool,
    /// Forward (`points_to`) closure per vertex, filled on demand.
    closures: FxHashMap<VertexId, FxHashSet<VertexId>>,
    /// Union of the forward closures of every written vertex.
    written_locations: FxHashSet<VertexId>,
    /// Union of the forward closures of every wildcard that has a vertex.
    wildcard_reachable: FxHashSet<VertexId>,
    /// Connected components of the undirected graph, built on first use.
    components: Option<AliasComponents>,
    rebuilds: usize,
}

impl ClosureCache {
    pub fn new() -> Self {
        ClosureCache {
            stale: true,
            closures: FxHashMap::default(),
            written_locations: FxHashSet::default(),
            wildcard_reachable: FxHashSet::default(),
            components: None,
            rebuilds: 0,
        }
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of full rebuilds performed so far.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Rebuild all derived state if anything changed since the last query.
    pub fn refresh<V, N>(
        &mut self,
        graph: &PointsToGraph<V>,
        writes: &WriteRegistry<N>,
        wildcards: &WildcardRegistry<V, N>,
        verify: bool,
    ) where
        V: Clone + Eq + Hash,
        N: Eq + Hash,
    {
        if !self.stale {
            return;
        }
        if verify {
            graph.verify_invariants();
        }

        self.closures.clear();
        self.components = None;
        self.stale = false;

        let mut written = FxHashSet::default();
        for vertex in writes.written_vertices() {
            written.extend(self.closure(graph, vertex).iter().copied());
        }
        self.written_locations = written;

        let mut reachable = FxHashSet::default();
        for value in wildcards.values() {
            if let Some(vertex) = graph.vertices().lookup(value) {
                reachable.extend(self.closure(graph, vertex).iter().copied());
            }
        }
        self.wildcard_reachable = reachable;

        self.rebuilds += 1;
        debug!(
            vertices = graph.vertices().len(),
            edges = graph.edge_count(),
            written_locations = self.written_locations.len(),
            rebuild = self.rebuilds,
            "rebuilt alias closure cache"
        );
    }

    /// Forward closure of `vertex`: the vertex itself plus everything it can
    /// reach along `points_to` edges.
    pub fn closure<V>(&mut self, graph: &PointsToGraph<V>, vertex: VertexId) -> &FxHashSet<VertexId>
    where
        V: Clone + Eq + Hash,
    {
        debug_assert!(!self.stale, "closure requested from a stale cache");
        self.closures.entry(vertex).or_insert_with(|| {
            trace!(%vertex, "computing memory-location closure");
            graph.reachable(vertex, BfsDirection::PointsTo)
        })
    }

    /// Do the forward closures of `a` and `b` share a vertex?
    pub fn closures_intersect<V>(&mut self, graph: &PointsToGraph<V>, a: VertexId, b: VertexId) -> bool
    where
        V: Clone + Eq + Hash,
    {
        self.closure(graph, a);
        self.closure(graph, b);
        let (left, right) = (&self.closures[&a], &self.closures[&b]);
        !left.is_disjoint(right)
    }

    /// Does the forward closure of `vertex` contain a written location?
    pub fn overlaps_written<V>(&mut self, graph: &PointsToGraph<V>, vertex: VertexId) -> bool
    where
        V: Clone + Eq + Hash,
    {
        if self.written_locations.is_empty() {
            return false;
        }
        self.closure(graph, vertex);
        !self.closures[&vertex].is_disjoint(&self.written_locations)
    }

    pub fn written_locations(&self) -> &FxHashSet<VertexId> {
        &self.written_locations
    }

    /// Does the forward closure of `vertex` meet anything a wildcard with a
    /// vertex can reach?
    pub fn overlaps_wildcard_reachable<V>(
        &mut self,
        graph: &PointsToGraph<V>,
        vertex: VertexId,
    ) -> bool
    where
        V: Clone + Eq + Hash,
    {
        if self.wildcard_reachable.is_empty() {
            return false;
        }
        self.closure(graph, vertex);
        !self.closures[&vertex].is_disjoint(&self.wildcard_reachable)
    }

    pub fn components<V>(&mut self, graph: &PointsToGraph<V>) -> &AliasComponents
    where
        V: Clone + Eq + Hash,
    {
        self.components
            .get_or_insert_with(|| AliasComponents::build(graph))
    }
}

impl Default for ClosureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Alias sets: connected components of the points-to graph with edge
/// direction ignored.
///
/// Two vertices share a component iff their bidirectional reachable sets
/// intersect, which for an undirected view means the sets are equal.
#[derive(Debug)]
pub struct AliasComponents {
    class_of: FxHashMap<VertexId, usize>,
    classes: Vec<Vec<VertexId>>,
}

impl AliasComponents {
    pub fn build<V>(graph: &PointsToGraph<V>) -> Self
    where
        V: Clone + Eq + Hash,
    {
        let vertices = graph.vertices();
        let mut leaders = ComponentLeaders::new(vertices.len());
        for (id, vertex) in vertices.iter() {
            for &target in &vertex.points_to {
                leaders.join(id.index(), target.index());
            }
        }

        let mut root_to_class: FxHashMap<usize, usize> = FxHashMap::default();
        let mut classes: Vec<Vec<VertexId>> = Vec::new();
        let mut class_of: FxHashMap<VertexId, usize> = FxHashMap::default();
        for (id, _) in vertices.iter() {
            let root = leaders.leader_of(id.index());
            let class = *root_to_class.entry(root).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });
            classes[class].push(id);
            class_of.insert(id, class);
        }

        AliasComponents { class_of, classes }
    }

    /// Every vertex in the same component as `vertex`, `vertex` included.
    pub fn members_of(&self, vertex: VertexId) -> &[VertexId] {
        self.class_of
            .get(&vertex)
            .map(|&class| self.classes[class].as_slice())
            .unwrap_or(&[])
    }

    pub fn same_component(&self, a: VertexId, b: VertexId) -> bool {
        match (self.class_of.get(&a), self.class_of.get(&b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Component leaders over vertex indices, merged as edges are seen.
#[derive(Debug)]
struct ComponentLeaders {
    leader: Vec<usize>,
    size: Vec<usize>,
}

impl ComponentLeaders {
    fn new(vertex_count: usize) -> Self {
        ComponentLeaders {
            leader: (0..vertex_count).collect(),
            size: vec![1; vertex_count],
        }
    }

    /// Leader of `vertex`'s component. Every vertex on the walk is pointed
    /// straight at the leader afterwards.
    fn leader_of(&mut self, vertex: usize) -> usize {
        let mut top = vertex;
        while self.leader[top] != top {
            top = self.leader[top];
        }
        let mut current = vertex;
        while current != top {
            current = std::mem::replace(&mut self.leader[current], top);
        }
        top
    }

    /// Join the components of `a` and `b`; the larger one keeps its leader.
    fn join(&mut self, a: usize, b: usize) {
        let (la, lb) = (self.leader_of(a), self.leader_of(b));
        if la == lb {
            return;
        }
        let (big, small) = if self.size[la] >= self.size[lb] {
            (la, lb)
        } else {
            (lb, la)
        };
        self.leader[small] = big;
        self.size[big] += self.size[small];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_edges(
        edges: &[(&'static str, &'static str)],
    ) -> PointsToGraph<&'static str> {
        let mut graph = PointsToGraph::new();
        for &(from, to) in edges {
            let f = graph.vertices_mut().get_or_insert(from);
            let t = graph.vertices_mut().get_or_insert(to);
            graph.add_edge(f, t);
        }
        graph
    }

    fn id(graph: &PointsToGraph<&'static str>, value: &'static str) -> VertexId {
        graph.vertices().lookup(&value).unwrap()
    }

    #[test]
    fn test_new_cache_is_stale() {
        let cache = ClosureCache::new();
        assert!(cache.is_stale());
        assert_eq!(cache.rebuilds(), 0);
    }

    #[test]
    fn test_refresh_only_rebuilds_when_stale() {
        let graph = graph_with_edges(&[("a", "b")]);
        let writes: WriteRegistry<u32> = WriteRegistry::new();
        let wildcards = WildcardRegistry::new();
        let mut cache = ClosureCache::new();

        cache.refresh(&graph, &writes, &wildcards, true);
        cache.refresh(&graph, &writes, &wildcards, true);
        assert_eq!(cache.rebuilds(), 1);

        cache.invalidate();
        cache.refresh(&graph, &writes, &wildcards, true);
        assert_eq!(cache.rebuilds(), 2);
    }

    #[test]
    fn test_closure_is_reflexive_and_forward_only() {
        let graph = graph_with_edges(&[("a", "b"), ("b", "c")]);
        let mut cache = ClosureCache::new();
        cache.refresh(&graph, &WriteRegistry::<u32>::new(), &WildcardRegistry::new(), false);

        let b = id(&graph, "b");
        let closure = cache.closure(&graph, b).clone();
        assert!(closure.contains(&b));
        assert!(closure.contains(&id(&graph, "c")));
        assert!(!closure.contains(&id(&graph, "a")));
    }

    #[test]
    fn test_written_locations_follow_closures() {
        let graph = graph_with_edges(&[("a", "b"), ("c", "d")]);
        let mut writes = WriteRegistry::new();
        writes.record(1u32, id(&graph, "a"));
        let mut cache = ClosureCache::new();
        cache.refresh(&graph, &writes, &WildcardRegistry::new(), true);

        let written = cache.written_locations();
        assert!(written.contains(&id(&graph, "a")));
        assert!(written.contains(&id(&graph, "b")));
        assert!(!written.contains(&id(&graph, "c")));
    }

    #[test]
    fn test_wildcard_reachability() {
        let graph = graph_with_edges(&[("w", "x"), ("y", "w"), ("q", "r")]);
        let mut wildcards: WildcardRegistry<&str, u32> = WildcardRegistry::new();
        wildcards.insert("w");
        let mut cache = ClosureCache::new();
        cache.refresh(&graph, &WriteRegistry::new(), &wildcards, true);

        assert!(cache.overlaps_wildcard_reachable(&graph, id(&graph, "w")));
        assert!(cache.overlaps_wildcard_reachable(&graph, id(&graph, "x")));
        assert!(
            cache.overlaps_wildcard_reachable(&graph, id(&graph, "y")),
            "y points into storage w reaches"
        );
        assert!(!cache.overlaps_wildcard_reachable(&graph, id(&graph, "q")));
    }

    #[test]
    fn test_components_ignore_direction() {
        let graph = graph_with_edges(&[("a", "b"), ("c", "b"), ("d", "e")]);
        let components = AliasComponents::build(&graph);
        assert_eq!(components.len(), 2);
        assert!(components.same_component(id(&graph, "a"), id(&graph, "c")));
        assert!(!components.same_component(id(&graph, "a"), id(&graph, "d")));
        assert_eq!(components.members_of(id(&graph, "b")).len(), 3);
    }

    #[test]
    fn test_component_leaders_merge_transitively() {
        let mut leaders = ComponentLeaders::new(4);
        leaders.join(0, 1);
        leaders.join(2, 3);
        assert_ne!(leaders.leader_of(0), leaders.leader_of(2));
        leaders.join(1, 3);
        assert_eq!(leaders.leader_of(0), leaders.leader_of(2));
    }
}
