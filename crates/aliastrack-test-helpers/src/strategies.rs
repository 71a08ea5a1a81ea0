//! proptest strategies over small value universes.
//!
//! Values and instructions are drawn from a handful of `u8`s so that random
//! operation logs produce dense, cyclic graphs with plenty of collisions.

use crate::ops::Op;
use proptest::collection::vec;
use proptest::prelude::*;

pub const VALUE_UNIVERSE: u8 = 12;
pub const INSTRUCTION_UNIVERSE: u8 = 4;

pub fn arb_value() -> impl Strategy<Value = u8> {
    0..VALUE_UNIVERSE
}

pub fn arb_instruction() -> impl Strategy<Value = u8> {
    0..INSTRUCTION_UNIVERSE
}

/// Edge insertions dominate so that graphs are well connected.
pub fn arb_op() -> impl Strategy<Value = Op<u8, u8>> {
    prop_oneof![
        2 => arb_value().prop_map(Op::<u8, u8>::Fresh),
        6 => (arb_value(), arb_value()).prop_map(|(v, to)| Op::PointTo(v, to)),
        1 => arb_value().prop_map(Op::<u8, u8>::Wildcard),
        2 => (arb_value(), arb_instruction()).prop_map(|(v, n)| Op::Write(v, n)),
    ]
}

pub fn arb_ops(max_len: usize) -> impl Strategy<Value = Vec<Op<u8, u8>>> {
    vec(arb_op(), 0..=max_len)
}

/// A multiset of values for group queries.
pub fn arb_group(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    vec(arb_value(), 0..=max_len)
}
