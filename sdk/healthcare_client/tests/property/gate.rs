//! Property-based tests for address handling and the owner gate.
//!
//! Invariants tested:
//! - Any upper/lower-case spelling of a strkey parses to the same identifier
//! - `is_owner` holds iff the lower-cased addresses are equal

use healthcare_client::gate::same_address;
use healthcare_client::{AccountId, AuthorizationGate};
use proptest::prelude::*;

const ACCOUNTS: [&str; 4] = [
    "GAAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQDZ7H",
    "GABAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEJXA",
    "GABQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQHGPC",
    "GACAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAJJHP",
];

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Lower-cases the characters selected by `mask`.
fn respell(strkey: &str, mask: &[bool]) -> String {
    strkey
        .chars()
        .zip(mask.iter().chain(std::iter::repeat(&false)))
        .map(|(c, lower)| if *lower { c.to_ascii_lowercase() } else { c })
        .collect()
}

// ── proptest! blocks ──────────────────────────────────────────────────────────

proptest! {
    /// Mixed-case spellings always parse to the canonical upper-case key.
    #[test]
    fn prop_parse_ignores_case(
        index in 0usize..ACCOUNTS.len(),
        mask in prop::collection::vec(any::<bool>(), 56),
    ) {
        let spelled = respell(ACCOUNTS[index], &mask);
        let parsed = AccountId::parse(&spelled).unwrap();
        prop_assert_eq!(parsed.as_str(), ACCOUNTS[index]);
    }

    /// The gate opens iff both addresses are equal once lower-cased.
    #[test]
    fn prop_is_owner_iff_lowercase_equal(
        account in 0usize..ACCOUNTS.len(),
        owner in 0usize..ACCOUNTS.len(),
        account_mask in prop::collection::vec(any::<bool>(), 56),
        owner_mask in prop::collection::vec(any::<bool>(), 56),
    ) {
        let account_raw = respell(ACCOUNTS[account], &account_mask);
        let owner_raw = respell(ACCOUNTS[owner], &owner_mask);

        let gate = AuthorizationGate::derive(
            &AccountId::parse(&account_raw).unwrap(),
            &AccountId::parse(&owner_raw).unwrap(),
        );
        let expected = account_raw.to_lowercase() == owner_raw.to_lowercase();
        prop_assert_eq!(gate.is_owner(), expected);
        prop_assert_eq!(same_address(&account_raw, &owner_raw), expected);
        prop_assert_eq!(gate.check().is_ok(), expected);
    }

    /// Arbitrary text never panics the parser.
    #[test]
    fn prop_parse_never_panics(input in ".{0,80}") {
        let _ = AccountId::parse(&input);
    }
}
