//! Property-based tests for the composition laws
//!
//! Uses proptest to check shape, flattening and ordering over arbitrary
//! layouts of present, absent and nested validators.

use proptest::prelude::*;
use valigator::{Func, SharedValidator, join, new};

use crate::common::{ServerConfig, VALID_CONFIG, load, marker, marker_indexes, shared};

/// One slot handed to `join`: absent, a single check, or a multi-validator
/// of the given width
#[derive(Debug, Clone)]
enum Slot {
    Absent,
    Single,
    Multi(usize),
}

fn slot() -> impl Strategy<Value = Slot> {
    prop_oneof![Just(Slot::Absent), Just(Slot::Single), (2usize..5).prop_map(Slot::Multi)]
}

/// Build validators whose checks fail with consecutive marker indexes
fn build(slots: &[Slot]) -> (Vec<Option<SharedValidator<ServerConfig>>>, usize) {
    let mut next = 0;
    let mut validators = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Slot::Absent => validators.push(None),
            Slot::Single => {
                validators.push(shared(marker(next)));
                next += 1;
            },
            Slot::Multi(width) => {
                validators.push(Some(new((next..next + width).map(marker))));
                next += width;
            },
        }
    }
    (validators, next)
}

proptest! {
    /// `new` collapses to noop / func / multi by surviving count
    #[test]
    fn new_shape_follows_survivor_count(present in prop::collection::vec(any::<bool>(), 0..12)) {
        let survivors = present.iter().filter(|p| **p).count();
        let checks: Vec<Func<ServerConfig>> = present
            .iter()
            .enumerate()
            .map(|(i, p)| if *p { marker(i) } else { Func::empty() })
            .collect();

        let validator = new(checks);
        match survivors {
            0 => prop_assert!(validator.kind().is_noop()),
            1 => prop_assert!(validator.kind().multi_len().is_none() && !validator.kind().is_noop()),
            n => prop_assert_eq!(validator.kind().multi_len(), Some(n)),
        }
    }

    /// A joined multi-validator's width is the sum of each input's width
    #[test]
    fn join_width_is_sum_of_flattened_widths(slots in prop::collection::vec(slot(), 0..8)) {
        let (validators, total) = build(&slots);
        let present = slots.iter().filter(|s| !matches!(s, Slot::Absent)).count();

        let joined = join(validators);
        match (present, total) {
            (0, _) => prop_assert!(joined.kind().is_noop()),
            (1, 1) => prop_assert!(joined.kind().multi_len().is_none()),
            (_, n) => prop_assert_eq!(joined.kind().multi_len(), Some(n)),
        }
    }

    /// Failures come back in construction order, one per member
    #[test]
    fn failures_keep_construction_order(slots in prop::collection::vec(slot(), 0..8)) {
        let (validators, total) = build(&slots);
        let joined = join(validators);

        let indexes = joined
            .validate(&load(VALID_CONFIG))
            .err()
            .map(|err| marker_indexes(&err))
            .unwrap_or_default();
        prop_assert_eq!(indexes, (0..total).collect::<Vec<_>>());
    }

    /// Joining in two steps gives the same members as joining at once
    #[test]
    fn nested_join_matches_flat_join(widths in prop::collection::vec(1usize..4, 2..6)) {
        let config = load(VALID_CONFIG);
        let total: usize = widths.iter().sum();

        let flat = join((0..total).map(|i| shared(marker(i))));

        let (head, tail) = widths.split_at(1);
        let mut next = head[0];
        let mut nested = join((0..next).map(|i| shared(marker(i))));
        for width in tail {
            let chunk = join((next..next + width).map(|i| shared(marker(i))));
            nested = join([Some(nested), Some(chunk)]);
            next += width;
        }

        prop_assert_eq!(nested.kind().multi_len(), flat.kind().multi_len());
        prop_assert_eq!(
            marker_indexes(&nested.validate(&config).unwrap_err()),
            marker_indexes(&flat.validate(&config).unwrap_err())
        );
    }
}
