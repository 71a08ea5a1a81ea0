//! Diagnostic view of a tracker.
//!
//! Value and instruction identities are opaque to the engine, so the
//! snapshot renders them through their `Debug` impls. The text form is for
//! humans and carries no compatibility promise.

use crate::error::Result;
use crate::tracker::AliasTracker;
use crate::Identity;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    pub vertices: Vec<VertexSnapshot>,
    pub edges: usize,
    pub wildcards: Vec<String>,
    pub writes: Vec<WriteSnapshot>,
    pub wildcard_writers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VertexSnapshot {
    pub index: usize,
    pub value: String,
    pub points_to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSnapshot {
    pub instruction: String,
    pub values: Vec<String>,
}

impl<V: Identity, N: Identity> AliasTracker<V, N> {
    /// Capture the graph, wildcards and writes in registration order.
    pub fn snapshot(&self) -> GraphSnapshot {
        let vertices = self.graph.vertices();
        let render = |id| format!("{:?}", vertices.value_of(id));

        GraphSnapshot {
            vertices: vertices
                .iter()
                .map(|(id, vertex)| VertexSnapshot {
                    index: id.index(),
                    value: format!("{:?}", vertex.value),
                    points_to: vertex.points_to.iter().map(|&to| render(to)).collect(),
                })
                .collect(),
            edges: self.graph.edge_count(),
            wildcards: self
                .wildcards
                .values()
                .iter()
                .map(|value| format!("{value:?}"))
                .collect(),
            writes: self
                .writes
                .iter()
                .map(|(instruction, written)| WriteSnapshot {
                    instruction: format!("{instruction:?}"),
                    values: written.iter().map(|&id| render(id)).collect(),
                })
                .collect(),
            wildcard_writers: self
                .wildcard_writers()
                .iter()
                .map(|instruction| format!("{instruction:?}"))
                .collect(),
        }
    }

    /// Render the tracker state as text.
    pub fn dump(&self) -> String {
        self.snapshot().to_string()
    }

    /// Render the tracker state as pretty-printed JSON.
    pub fn dump_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

impl<V: Identity, N: Identity> fmt::Display for AliasTracker<V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.snapshot(), f)
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

impl fmt::Display for GraphSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "points-to graph ({} vertices, {} edges)",
            self.vertices.len(),
            self.edges
        )?;
        for vertex in &self.vertices {
            write!(f, "  %{} {}", vertex.index, vertex.value)?;
            if !vertex.points_to.is_empty() {
                write!(f, " -> {}", vertex.points_to.join(", "))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "wildcards: {}", join_or_none(&self.wildcards))?;
        if self.writes.is_empty() {
            writeln!(f, "writes: (none)")?;
        } else {
            writeln!(f, "writes:")?;
            for write in &self.writes {
                writeln!(f, "  {} -> {}", write.instruction, write.values.join(", "))?;
            }
        }
        write!(f, "wildcard writers: {}", join_or_none(&self.wildcard_writers))
    }
}
