//! Test utilities and fixtures for aliastrack.

pub mod fixtures;
pub mod logging;
pub mod model;
pub mod ops;
pub mod strategies;

pub use fixtures::{
    lenient_tracker_from_fixture, names, parse_ops, tracker_from_fixture, v, FixtureTracker,
};
pub use logging::init_tracing;
pub use model::NaiveModel;
pub use ops::{replay, Op};
