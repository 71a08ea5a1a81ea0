//! Tracker configuration.
//!
//! None of these knobs change query results. They only trade memory for
//! speed or enable extra self-checking.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for an [`AliasTracker`](crate::AliasTracker).
///
/// Every field has a default, so partial YAML/JSON documents are accepted:
///
/// ```
/// use aliastrack_core::TrackerConfig;
///
/// let config = TrackerConfig::from_yaml_str("vertex_capacity: 128").unwrap();
/// assert_eq!(config.vertex_capacity, 128);
/// assert!(config.dedup_group_members);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Number of vertices to pre-allocate in the arena.
    pub vertex_capacity: usize,
    /// Skip repeated members of a group when computing group alias queries.
    pub dedup_group_members: bool,
    /// Check edge mutuality every time the closure cache is rebuilt.
    pub verify_on_rebuild: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            vertex_capacity: 0,
            dedup_group_members: true,
            verify_on_rebuild: cfg!(debug_assertions),
        }
    }
}

impl TrackerConfig {
    /// Parse a configuration from a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn with_vertex_capacity(mut self, capacity: usize) -> Self {
        self.vertex_capacity = capacity;
        self
    }

    pub fn with_dedup_group_members(mut self, dedup: bool) -> Self {
        self.dedup_group_members = dedup;
        self
    }

    pub fn with_verify_on_rebuild(mut self, verify: bool) -> Self {
        self.verify_on_rebuild = verify;
        self
    }
}
