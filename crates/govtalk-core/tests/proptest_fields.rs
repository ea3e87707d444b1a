// crates/govtalk-core/tests/proptest_fields.rs
// ============================================================================
// Module: Field Property Tests
// Description: Property-based checks for field validation invariants.
// ============================================================================
//! ## Overview
//! Property tests over the correlation-id alphabet, the exclusive message
//! class bounds, and target organisation deduplication.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use govtalk_core::CorrelationId;
use govtalk_core::MessageClass;
use govtalk_core::TargetOrganisation;
use govtalk_core::TargetOrganisations;
use proptest::prelude::*;

proptest! {
    #[test]
    fn correlation_ids_over_the_hex_alphabet_are_accepted(id in "[0-9A-F]{0,32}") {
        prop_assert!(CorrelationId::new(id).is_ok());
    }

    #[test]
    fn correlation_ids_with_foreign_characters_are_rejected(
        prefix in "[0-9A-F]{0,10}",
        bad in "[g-z!@#$%^&*()]{1,4}",
        suffix in "[0-9A-F]{0,10}",
    ) {
        let combined = [prefix.as_str(), bad.as_str(), suffix.as_str()].concat();
        prop_assert!(CorrelationId::new(combined).is_err());
    }

    #[test]
    fn message_class_acceptance_matches_the_exclusive_bounds(class in "[A-Z-]{1,40}") {
        let length = class.chars().count();
        let accepted = MessageClass::new(class).is_ok();
        prop_assert_eq!(accepted, length > 4 && length < 32);
    }

    #[test]
    fn unforced_target_additions_never_duplicate(names in proptest::collection::vec("[A-Z]{1,8}", 1..20)) {
        let mut targets = TargetOrganisations::new();
        for name in &names {
            targets.add(TargetOrganisation::new(name.clone()).expect("target"), false);
        }
        let mut seen = Vec::new();
        for entry in targets.entries() {
            prop_assert!(!seen.contains(&entry.as_str().to_string()));
            seen.push(entry.as_str().to_string());
        }
    }
}
