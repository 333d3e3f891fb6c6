//! Property-based invariant tests for constraint evaluation.
//!
//! 1. Evaluation is pure: same constraints and value give the same snapshot.
//! 2. Empty values only ever fail `required` (or a custom error).
//! 3. `TooShort` and `TooLong` never hold together.
//! 4. A value matching a digits-only pattern never reports `PatternMismatch`.

use formgroup_core::{Constraints, InputType, ValidityFlag, ValidityState};
use proptest::prelude::*;

fn text_constraints() -> impl Strategy<Value = Constraints> {
    (proptest::bool::ANY, 0usize..8, 0usize..8).prop_map(|(required, min, extra)| {
        Constraints::new(InputType::Text)
            .required(required)
            .min_length(min)
            .max_length(min + extra)
    })
}

proptest! {
    #[test]
    fn evaluation_is_pure(c in text_constraints(), value in ".{0,12}") {
        prop_assert_eq!(c.evaluate(&value, ""), c.evaluate(&value, ""));
    }

    #[test]
    fn empty_value_only_fails_required(c in text_constraints()) {
        let state = c.evaluate("", "");
        let expected = if c.is_required() {
            ValidityState::from_flags([ValidityFlag::ValueMissing])
        } else {
            ValidityState::VALID
        };
        prop_assert_eq!(state, expected);
    }

    #[test]
    fn length_failures_are_exclusive(c in text_constraints(), value in "[a-z]{0,16}") {
        let state = c.evaluate(&value, "");
        prop_assert!(!(state.has(ValidityFlag::TooShort) && state.has(ValidityFlag::TooLong)));
    }

    #[test]
    fn digits_match_digit_pattern(value in "[0-9]{1,10}") {
        let c = Constraints::new(InputType::Text).pattern("[0-9]+").expect("pattern compiles");
        prop_assert!(c.evaluate(&value, "").is_valid());
    }

    #[test]
    fn numbers_within_range_are_valid(n in -50i32..=50) {
        let c = Constraints::new(InputType::Number).min(-50.0).max(50.0);
        prop_assert!(c.evaluate(&n.to_string(), "").is_valid());
    }
}
