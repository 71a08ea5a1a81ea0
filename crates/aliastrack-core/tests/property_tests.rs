//! Property tests comparing the cached tracker against a naive model and
//! against trackers rebuilt from scratch.

use aliastrack_core::{AliasTracker, TrackerConfig};
use aliastrack_test_helpers::strategies::{
    arb_group, arb_ops, arb_value, INSTRUCTION_UNIVERSE, VALUE_UNIVERSE,
};
use aliastrack_test_helpers::{replay, NaiveModel, Op};
use proptest::prelude::*;

type Tracker = AliasTracker<u8, u8>;

fn universe() -> impl Iterator<Item = u8> {
    0..VALUE_UNIVERSE
}

fn doubled(group: &[u8]) -> Vec<u8> {
    group.iter().chain(group.iter()).copied().collect()
}

proptest! {
    #[test]
    fn prop_may_alias_matches_model(ops in arb_ops(40)) {
        let tracker = replay(&ops);
        let model = NaiveModel::from_ops(&ops);
        for a in universe() {
            for b in universe() {
                prop_assert_eq!(tracker.may_alias(&a, &b), model.may_alias(&a, &b), "a={} b={}", a, b);
            }
        }
    }

    #[test]
    fn prop_may_alias_is_symmetric(ops in arb_ops(40), a in arb_value(), b in arb_value()) {
        let tracker = replay(&ops);
        prop_assert_eq!(tracker.may_alias(&a, &b), tracker.may_alias(&b, &a));
    }

    #[test]
    fn prop_may_alias_is_reflexive(ops in arb_ops(40)) {
        let tracker = replay(&ops);
        for value in universe().filter(|v| tracker.contains(v)) {
            prop_assert!(tracker.may_alias(&value, &value));
        }
    }

    #[test]
    fn prop_group_matches_pairwise(
        ops in arb_ops(40),
        group_a in arb_group(5),
        group_b in arb_group(5),
    ) {
        let tracker = replay(&ops);
        let pairwise = group_a
            .iter()
            .any(|a| group_b.iter().any(|b| tracker.may_alias(a, b)));
        prop_assert_eq!(tracker.may_alias_groups(&group_a, &group_b), pairwise);

        let model = NaiveModel::from_ops(&ops);
        prop_assert_eq!(model.may_alias_groups(&group_a, &group_b), pairwise);
    }

    #[test]
    fn prop_group_ignores_duplicates(
        ops in arb_ops(40),
        group_a in arb_group(4),
        group_b in arb_group(4),
    ) {
        let tracker = replay(&ops);
        let expected = tracker.may_alias_groups(&group_a, &group_b);
        prop_assert_eq!(tracker.may_alias_groups(&doubled(&group_a), &group_b), expected);
        prop_assert_eq!(tracker.may_alias_groups(&group_a, &doubled(&group_b)), expected);
    }

    #[test]
    fn prop_dedup_setting_does_not_change_results(
        ops in arb_ops(40),
        group_a in arb_group(6),
        group_b in arb_group(6),
    ) {
        let deduped = replay(&ops);
        let mut plain: Tracker =
            AliasTracker::with_config(TrackerConfig::default().with_dedup_group_members(false));
        for op in &ops {
            op.apply(&mut plain);
        }
        prop_assert_eq!(
            deduped.may_alias_groups(&group_a, &group_b),
            plain.may_alias_groups(&group_a, &group_b)
        );
    }

    #[test]
    fn prop_get_aliases_matches_model(ops in arb_ops(40)) {
        let tracker = replay(&ops);
        let model = NaiveModel::from_ops(&ops);
        for value in universe() {
            let aliases = tracker.get_aliases(&value);
            prop_assert!(!aliases.contains(&value));
            prop_assert_eq!(&aliases, &model.get_aliases(&value), "value={}", value);
            for other in &aliases {
                prop_assert!(tracker.get_aliases(other).contains(&value));
            }
        }
    }

    #[test]
    fn prop_writers_match_model(ops in arb_ops(40)) {
        let tracker = replay(&ops);
        let model = NaiveModel::from_ops(&ops);
        prop_assert_eq!(tracker.wildcard_writers().len(), model.wildcard_writers().len());
        for value in universe() {
            prop_assert_eq!(tracker.has_writers(&value), model.has_writers(&value), "value={}", value);
            for instruction in 0..INSTRUCTION_UNIVERSE {
                let direct = tracker.writes_to(&instruction, &value);
                prop_assert_eq!(direct, model.writes_to(&instruction, &value));
                if direct {
                    prop_assert!(tracker.has_writers(&value));
                }
            }
        }
    }

    /// Querying between mutations must never change later answers compared
    /// with a tracker that only sees the final graph.
    #[test]
    fn prop_cache_transparency(ops in arb_ops(40), split in 0usize..40) {
        let split = split.min(ops.len());
        let mut incremental: Tracker = AliasTracker::new();
        for (i, op) in ops.iter().enumerate() {
            op.apply(&mut incremental);
            if i == split || i % 7 == 0 {
                for a in universe() {
                    incremental.may_alias(&a, &0);
                    incremental.has_writers(&a);
                    incremental.get_aliases(&a);
                }
            }
        }
        let rebuilt = replay(&ops);
        incremental.verify_invariants();

        for a in universe() {
            prop_assert_eq!(incremental.get_aliases(&a), rebuilt.get_aliases(&a));
            prop_assert_eq!(incremental.has_writers(&a), rebuilt.has_writers(&a));
            prop_assert_eq!(incremental.memory_locations(&a), rebuilt.memory_locations(&a));
            for b in universe() {
                prop_assert_eq!(incremental.may_alias(&a, &b), rebuilt.may_alias(&a, &b));
            }
        }
        prop_assert_eq!(incremental.dump(), rebuilt.dump());
    }
}

#[test]
fn test_fresh_values_stay_isolated() {
    let ops: Vec<Op<u8, u8>> = universe().map(Op::Fresh).collect();
    let tracker = replay(&ops);
    for a in universe() {
        for b in universe().filter(|&b| b != a) {
            assert!(!tracker.may_alias(&a, &b), "{a} and {b} were never connected");
        }
    }
}

#[test]
fn test_shared_target_implies_alias() {
    for (a, b, c) in [(0u8, 1u8, 2u8), (3, 3, 4), (5, 6, 5)] {
        let tracker = replay::<u8, u8>(&[Op::PointTo(a, b), Op::PointTo(c, b)]);
        assert!(tracker.may_alias(&a, &c), "{a} -> {b} <- {c}");
    }
}
