//! Error types for alias tracker usage errors.
//!
//! Broken internal invariants are not represented here: they abort through
//! assertions in [`crate::graph::PointsToGraph::verify_invariants`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AliasError>;

#[derive(Debug, Error)]
pub enum AliasError {
    /// `make_fresh_value` was called for a value that already has a vertex.
    #[error("value {0} is already registered with the alias tracker")]
    AlreadyRegistered(String),

    /// A write was registered through a value that is neither tracked nor a
    /// wildcard.
    #[error("value {0} is not tracked and is not a wildcard")]
    UnknownValue(String),

    #[error("invalid YAML tracker configuration: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON tracker configuration: {0}")]
    ConfigJson(#[from] serde_json::Error),
}

impl AliasError {
    pub(crate) fn already_registered(value: &impl std::fmt::Debug) -> Self {
        AliasError::AlreadyRegistered(format!("{value:?}"))
    }

    pub(crate) fn unknown_value(value: &impl std::fmt::Debug) -> Self {
        AliasError::UnknownValue(format!("{value:?}"))
    }

    /// Returns true for errors caused by registration order rather than by
    /// bad configuration input.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            AliasError::AlreadyRegistered(_) | AliasError::UnknownValue(_)
        )
    }
}
