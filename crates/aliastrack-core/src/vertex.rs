//! Vertex arena for the points-to graph.
//!
//! Every vertex is owned by a single [`id_arena::Arena`]; the rest of the
//! engine refers to vertices through copyable [`VertexId`] handles. Vertices
//! are never freed individually, the whole arena is dropped with the tracker.

use crate::FxIndexSet;
use id_arena::{Arena, ArenaBehavior};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// Handle to a vertex in a [`VertexArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId {
    arena: u32,
    index: u32,
}

impl VertexId {
    /// Position of the vertex in registration order.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.index)
    }
}

/// Arena behavior producing [`VertexId`] handles instead of `id_arena::Id<T>`,
/// so that caches can key on ids without carrying the value type around.
#[derive(Debug)]
pub struct VertexIds;

impl ArenaBehavior for VertexIds {
    type Id = VertexId;

    fn new_id(arena_id: u32, index: usize) -> VertexId {
        assert!(
            index <= u32::MAX as usize,
            "vertex arena exceeded u32::MAX vertices"
        );
        VertexId {
            arena: arena_id,
            index: index as u32,
        }
    }

    fn index(id: VertexId) -> usize {
        id.index as usize
    }

    fn arena_id(id: VertexId) -> u32 {
        id.arena
    }
}

/// A node of the points-to graph, in 1:1 correspondence with a value.
#[derive(Debug, Clone)]
pub struct Vertex<V> {
    pub(crate) value: V,
    /// Vertices this one may point to. More than one target is a union over
    /// control-flow paths.
    pub(crate) points_to: FxIndexSet<VertexId>,
    /// Inverse of `points_to`.
    pub(crate) pointed_from: FxIndexSet<VertexId>,
}

impl<V> Vertex<V> {
    fn new(value: V) -> Self {
        Vertex {
            value,
            points_to: FxIndexSet::default(),
            pointed_from: FxIndexSet::default(),
        }
    }

    /// The value this vertex was created for.
    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn points_to(&self) -> &FxIndexSet<VertexId> {
        &self.points_to
    }

    pub fn pointed_from(&self) -> &FxIndexSet<VertexId> {
        &self.pointed_from
    }
}

/// Owns all vertices and indexes them by value identity.
#[derive(Debug)]
pub struct VertexArena<V> {
    vertices: Arena<Vertex<V>, VertexIds>,
    by_value: FxHashMap<V, VertexId>,
}

impl<V> VertexArena<V>
where
    V: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        VertexArena {
            vertices: Arena::with_capacity(capacity),
            by_value: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    pub fn contains(&self, value: &V) -> bool {
        self.by_value.contains_key(value)
    }

    pub fn lookup(&self, value: &V) -> Option<VertexId> {
        self.by_value.get(value).copied()
    }

    /// Allocate a vertex for a value that has none yet.
    ///
    /// Returns `None` if `value` already owns a vertex.
    pub fn insert_new(&mut self, value: V) -> Option<VertexId> {
        if self.by_value.contains_key(&value) {
            return None;
        }
        let id = self.vertices.alloc(Vertex::new(value.clone()));
        self.by_value.insert(value, id);
        Some(id)
    }

    /// Return the vertex for `value`, allocating one if needed.
    pub fn get_or_insert(&mut self, value: V) -> VertexId {
        if let Some(id) = self.lookup(&value) {
            return id;
        }
        let id = self.vertices.alloc(Vertex::new(value.clone()));
        self.by_value.insert(value, id);
        id
    }

    pub fn get(&self, id: VertexId) -> &Vertex<V> {
        &self.vertices[id]
    }

    /// Edges must only change through `PointsToGraph::add_edge`.
    pub(crate) fn get_mut(&mut self, id: VertexId) -> &mut Vertex<V> {
        &mut self.vertices[id]
    }

    pub fn value_of(&self, id: VertexId) -> &V {
        &self.vertices[id].value
    }

    /// Iterate over all vertices in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex<V>)> {
        self.vertices.iter()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() == 0
    }

    /// Number of entries in the value index. Equal to `len()` unless the
    /// arena is corrupted.
    pub(crate) fn indexed_len(&self) -> usize {
        self.by_value.len()
    }
}

impl<V> Default for VertexArena<V>
where
    V: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
