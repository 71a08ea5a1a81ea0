//! A deliberately naive alias model with no caching.
//!
//! Every query walks the raw edge list, so it serves as ground truth for
//! property tests against [`AliasTracker`](aliastrack_core::AliasTracker).

use crate::ops::Op;
use aliastrack_core::Identity;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone)]
pub struct NaiveModel<V, N> {
    values: Vec<V>,
    edges: Vec<(V, V)>,
    wildcards: FxHashSet<V>,
    writes: Vec<(N, V)>,
    wildcard_writers: FxHashSet<N>,
    num_writes: usize,
}

impl<V: Identity, N: Identity> NaiveModel<V, N> {
    pub fn new() -> Self {
        NaiveModel {
            values: Vec::new(),
            edges: Vec::new(),
            wildcards: FxHashSet::default(),
            writes: Vec::new(),
            wildcard_writers: FxHashSet::default(),
            num_writes: 0,
        }
    }

    pub fn from_ops(ops: &[Op<V, N>]) -> Self {
        let mut model = Self::new();
        for op in ops {
            model.apply(op);
        }
        model
    }

    pub fn apply(&mut self, op: &Op<V, N>) {
        match op {
            Op::Fresh(value) => {
                self.register(value);
            }
            Op::PointTo(value, target) => {
                self.register(value);
                self.register(target);
                self.edges.push((value.clone(), target.clone()));
            }
            Op::Wildcard(value) => {
                self.wildcards.insert(value.clone());
            }
            Op::Write(value, instruction) => {
                let tracked = self.contains(value);
                let wildcard = self.wildcards.contains(value);
                if !tracked && !wildcard {
                    return;
                }
                self.num_writes += 1;
                if wildcard {
                    self.wildcard_writers.insert(instruction.clone());
                }
                if tracked {
                    self.writes.push((instruction.clone(), value.clone()));
                }
            }
        }
    }

    fn register(&mut self, value: &V) {
        if !self.contains(value) {
            self.values.push(value.clone());
        }
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn contains(&self, value: &V) -> bool {
        self.values.contains(value)
    }

    pub fn is_wildcard(&self, value: &V) -> bool {
        self.wildcards.contains(value)
    }

    fn reach(&self, start: &V, forward: bool, backward: bool) -> FxHashSet<V> {
        let mut seen = FxHashSet::default();
        if !self.contains(start) {
            return seen;
        }
        let mut stack = vec![start.clone()];
        seen.insert(start.clone());
        while let Some(current) = stack.pop() {
            for (from, to) in &self.edges {
                let next = if forward && *from == current {
                    Some(to)
                } else if backward && *to == current {
                    Some(from)
                } else {
                    None
                };
                if let Some(next) = next {
                    if seen.insert(next.clone()) {
                        stack.push(next.clone());
                    }
                }
            }
        }
        seen
    }

    pub fn memory_locations(&self, value: &V) -> FxHashSet<V> {
        self.reach(value, true, false)
    }

    pub fn may_alias(&self, a: &V, b: &V) -> bool {
        if self.is_wildcard(a) || self.is_wildcard(b) {
            return true;
        }
        let left = self.memory_locations(a);
        let right = self.memory_locations(b);
        !left.is_disjoint(&right)
    }

    /// Pairwise definition of the group query.
    pub fn may_alias_groups(&self, a: &[V], b: &[V]) -> bool {
        a.iter().any(|x| b.iter().any(|y| self.may_alias(x, y)))
    }

    pub fn get_aliases(&self, value: &V) -> FxHashSet<V> {
        let mut set = self.reach(value, true, true);
        set.remove(value);
        set
    }

    pub fn writes_to(&self, instruction: &N, value: &V) -> bool {
        self.writes
            .iter()
            .any(|(n, v)| n == instruction && v == value)
    }

    pub fn has_writers(&self, value: &V) -> bool {
        let wildcard = self.is_wildcard(value);
        if wildcard && self.num_writes > 0 {
            return true;
        }
        if !self.contains(value) {
            return false;
        }
        let locations = self.memory_locations(value);
        if !self.wildcard_writers.is_empty()
            && self
                .wildcards
                .iter()
                .any(|w| !self.memory_locations(w).is_disjoint(&locations))
        {
            return true;
        }
        self.writes
            .iter()
            .any(|(_, written)| !self.memory_locations(written).is_disjoint(&locations))
    }

    pub fn wildcard_writers(&self) -> &FxHashSet<N> {
        &self.wildcard_writers
    }
}

impl<V: Identity, N: Identity> Default for NaiveModel<V, N> {
    fn default() -> Self {
        Self::new()
    }
}
