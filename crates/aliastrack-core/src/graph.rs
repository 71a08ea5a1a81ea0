//! Points-to graph over the vertex arena.
//!
//! The graph is directed and may contain cycles. An edge `a -> b` means the
//! value of `a` may point to (share storage with) the value of `b`. Both edge
//! directions are stored so traversals can walk either way.

use crate::vertex::{VertexArena, VertexId};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::hash::Hash;

/// Which edges a breadth-first search follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BfsDirection {
    PointsTo,
    PointedFrom,
    /// Both directions. The closure obtained this way is the whole alias set
    /// of a vertex.
    Both,
}

#[derive(Debug)]
pub struct PointsToGraph<V> {
    vertices: VertexArena<V>,
    edge_count: usize,
}

impl<V> PointsToGraph<V>
where
    V: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PointsToGraph {
            vertices: VertexArena::with_capacity(capacity),
            edge_count: 0,
        }
    }

    pub fn vertices(&self) -> &VertexArena<V> {
        &self.vertices
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut VertexArena<V> {
        &mut self.vertices
    }

    /// Number of distinct `points_to` edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Add `from -> to`, keeping both edge views in sync.
    ///
    /// Returns false if the edge already existed.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> bool {
        let inserted = self.vertices.get_mut(from).points_to.insert(to);
        let mirrored = self.vertices.get_mut(to).pointed_from.insert(from);
        assert_eq!(
            inserted, mirrored,
            "points-to edge {from} -> {to} was only half present"
        );
        if inserted {
            self.edge_count += 1;
        }
        inserted
    }

    /// Breadth-first search from `start`, calling `visit` on every reached
    /// vertex (including `start`) exactly once.
    ///
    /// If `visit` returns true the search stops early and `bfs` returns true.
    pub fn bfs(
        &self,
        start: VertexId,
        direction: BfsDirection,
        mut visit: impl FnMut(VertexId) -> bool,
    ) -> bool {
        let mut seen: FxHashSet<VertexId> = FxHashSet::default();
        let mut queue: VecDeque<VertexId> = VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if visit(current) {
                return true;
            }
            let vertex = self.vertices.get(current);
            let forward = matches!(direction, BfsDirection::PointsTo | BfsDirection::Both)
                .then_some(&vertex.points_to);
            let backward = matches!(direction, BfsDirection::PointedFrom | BfsDirection::Both)
                .then_some(&vertex.pointed_from);
            for &next in forward.into_iter().chain(backward).flatten() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    /// All vertices reachable from `start` in `direction`, `start` included.
    pub fn reachable(&self, start: VertexId, direction: BfsDirection) -> FxHashSet<VertexId> {
        let mut out = FxHashSet::default();
        self.bfs(start, direction, |id| {
            out.insert(id);
            false
        });
        out
    }

    /// Abort if the edge views or the value index disagree.
    ///
    /// A failure here is a bug in the tracker, never bad caller input.
    pub fn verify_invariants(&self) {
        assert_eq!(
            self.vertices.len(),
            self.vertices.indexed_len(),
            "value index and vertex arena have diverged"
        );
        let mut forward_edges = 0;
        for (id, vertex) in self.vertices.iter() {
            assert_eq!(
                self.vertices.lookup(&vertex.value),
                Some(id),
                "vertex {id} is not indexed under its own value"
            );
            for &target in &vertex.points_to {
                assert!(
                    self.vertices.get(target).pointed_from.contains(&id),
                    "{id} -> {target} has no matching pointed_from entry"
                );
            }
            for &source in &vertex.pointed_from {
                assert!(
                    self.vertices.get(source).points_to.contains(&id),
                    "{source} -> {id} has no matching points_to entry"
                );
            }
            forward_edges += vertex.points_to.len();
        }
        assert_eq!(forward_edges, self.edge_count, "edge count out of sync");
    }
}

impl<V> Default for PointsToGraph<V>
where
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(values: &[&'static str]) -> (PointsToGraph<&'static str>, Vec<VertexId>) {
        let mut graph = PointsToGraph::new();
        let ids: Vec<_> = values
            .iter()
            .map(|v| graph.vertices_mut().get_or_insert(*v))
            .collect();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1]);
        }
        (graph, ids)
    }

    #[test]
    fn test_add_edge_is_mutual() {
        let (graph, ids) = chain(&["a", "b"]);
        assert!(graph.vertices().get(ids[0]).points_to().contains(&ids[1]));
        assert!(graph.vertices().get(ids[1]).pointed_from().contains(&ids[0]));
        graph.verify_invariants();
    }

    #[test]
    #[should_panic(expected = "has no matching pointed_from entry")]
    fn test_verify_aborts_on_missing_pointed_from() {
        let (mut graph, ids) = chain(&["a", "b"]);
        graph.vertices_mut().get_mut(ids[1]).pointed_from.clear();
        graph.verify_invariants();
    }

    #[test]
    #[should_panic(expected = "has no matching points_to entry")]
    fn test_verify_aborts_on_missing_points_to() {
        let (mut graph, ids) = chain(&["a", "b"]);
        graph.vertices_mut().get_mut(ids[0]).points_to.clear();
        graph.verify_invariants();
    }

    #[test]
    #[should_panic(expected = "was only half present")]
    fn test_add_edge_aborts_on_half_edge() {
        let (mut graph, ids) = chain(&["a", "b"]);
        graph.vertices_mut().get_mut(ids[1]).pointed_from.clear();
        graph.add_edge(ids[0], ids[1]);
    }

    #[test]
    fn test_duplicate_edge_is_ignored() {
        let (mut graph, ids) = chain(&["a", "b"]);
        assert!(!graph.add_edge(ids[0], ids[1]));
        assert_eq!(graph.edge_count(), 1);
        graph.verify_invariants();
    }

    #[test]
    fn test_reachable_respects_direction() {
        let (graph, ids) = chain(&["a", "b", "c"]);
        let forward = graph.reachable(ids[1], BfsDirection::PointsTo);
        assert_eq!(forward, [ids[1], ids[2]].into_iter().collect());
        let backward = graph.reachable(ids[1], BfsDirection::PointedFrom);
        assert_eq!(backward, [ids[0], ids[1]].into_iter().collect());
        let both = graph.reachable(ids[1], BfsDirection::Both);
        assert_eq!(both.len(), 3);
    }

    #[test]
    fn test_bfs_terminates_on_cycles() {
        let (mut graph, ids) = chain(&["a", "b", "c"]);
        graph.add_edge(ids[2], ids[0]);
        let reached = graph.reachable(ids[0], BfsDirection::PointsTo);
        assert_eq!(reached.len(), 3);
        graph.verify_invariants();
    }

    #[test]
    fn test_self_loop() {
        let (mut graph, ids) = chain(&["a"]);
        graph.add_edge(ids[0], ids[0]);
        assert_eq!(graph.reachable(ids[0], BfsDirection::Both).len(), 1);
        graph.verify_invariants();
    }

    #[test]
    fn test_bfs_short_circuits() {
        let (graph, ids) = chain(&["a", "b", "c", "d"]);
        let mut visited = 0;
        let found = graph.bfs(ids[0], BfsDirection::PointsTo, |id| {
            visited += 1;
            id == ids[1]
        });
        assert!(found);
        assert_eq!(visited, 2, "search should stop at the first match");
    }
}
