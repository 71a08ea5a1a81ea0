//! Text fixtures for alias graphs.
//!
//! One statement per line, `#` starts a comment:
//!
//! ```text
//! a -> b          # a may point to b
//! c -> b, d       # several targets
//! fresh e
//! wildcard w
//! write store1 a  # instruction `store1` writes a
//! ```

use crate::ops::{replay, Op};
use aliastrack_core::AliasTracker;

pub type FixtureTracker = AliasTracker<String, String>;

/// Parse a fixture into its operation log.
pub fn parse_ops(source: &str) -> Result<Vec<Op<String, String>>, String> {
    let mut ops = Vec::new();
    for (line_no, raw) in source.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let err = |msg: &str| format!("line {}: {msg}: `{line}`", line_no + 1);

        if let Some((from, targets)) = line.split_once("->") {
            let from = from.trim();
            if from.is_empty() {
                return Err(err("missing pointer source"));
            }
            for target in targets.split(',').map(str::trim) {
                if target.is_empty() {
                    return Err(err("empty pointer target"));
                }
                ops.push(Op::PointTo(from.to_string(), target.to_string()));
            }
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["fresh", value] => ops.push(Op::Fresh(value.to_string())),
            ["wildcard", value] => ops.push(Op::Wildcard(value.to_string())),
            ["write", instruction, value] => {
                ops.push(Op::Write(value.to_string(), instruction.to_string()))
            }
            _ => return Err(err("unrecognised statement")),
        }
    }
    Ok(ops)
}

/// Build a tracker from a fixture. Any rejected operation is an error.
pub fn tracker_from_fixture(source: &str) -> Result<FixtureTracker, String> {
    let ops = parse_ops(source)?;
    let mut tracker = AliasTracker::new();
    for op in &ops {
        if !op.apply(&mut tracker) {
            return Err(format!("fixture operation rejected: {op:?}"));
        }
    }
    Ok(tracker)
}

/// Build a tracker from a fixture, skipping rejected operations.
pub fn lenient_tracker_from_fixture(source: &str) -> Result<FixtureTracker, String> {
    Ok(replay(&parse_ops(source)?))
}

/// Shorthand for building a `String` owned value from a fixture name.
pub fn v(name: &str) -> String {
    name.to_string()
}

/// Collect names into the set type returned by `get_aliases`.
pub fn names(values: &[&str]) -> rustc_hash::FxHashSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}
