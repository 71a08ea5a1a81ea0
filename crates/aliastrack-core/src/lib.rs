//! Conservative points-to and alias tracking for optimization passes.
//!
//! Passes such as dead-store elimination or instruction reordering ask this
//! engine whether two IR values may refer to the same memory before they
//! transform anything. The components form a dependency chain:
//!
//! ```text
//! VertexArena (owns every vertex)
//!  └─> PointsToGraph (handle edges, both directions)
//!       └─> ClosureCache (forward closures, written locations, alias sets)
//!            └─> AliasTracker (construction API + queries)
//!
//! WildcardRegistry, WriteRegistry (independent, feed the cache)
//! ```
//!
//! The tracker is built once per analysis run, mutated while the IR is
//! walked, then queried in batches. Every mutation marks the cache stale and
//! the next query rebuilds it from scratch.
//!
//! ```
//! use aliastrack_core::AliasTracker;
//!
//! let mut tracker: AliasTracker<&str, u32> = AliasTracker::new();
//! tracker.make_pointer_to("a", "b");
//! tracker.make_pointer_to("c", "b");
//! assert!(tracker.may_alias(&"a", &"c"));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod graph;
pub mod shared;
pub mod snapshot;
pub mod tracker;
pub mod vertex;
pub mod wildcard;
pub mod writes;

pub use config::TrackerConfig;
pub use error::{AliasError, Result};
pub use graph::{BfsDirection, PointsToGraph};
pub use shared::SharedAliasTracker;
pub use snapshot::{GraphSnapshot, VertexSnapshot, WriteSnapshot};
pub use tracker::{AliasTracker, TrackerStats};
pub use vertex::{Vertex, VertexArena, VertexId};

use rustc_hash::FxBuildHasher;
use std::fmt::Debug;
use std::hash::Hash;

/// Insertion-ordered set with the Fx hasher.
pub type FxIndexSet<K> = indexmap::IndexSet<K, FxBuildHasher>;

/// Requirements on value and instruction identities. Only identity matters:
/// the tracker compares, hashes, clones and (for diagnostics) prints them.
pub trait Identity: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Identity for T {}
