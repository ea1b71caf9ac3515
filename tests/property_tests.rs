//! Property-based tests for core domain types and branch naming.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use proptest::prelude::*;

use landfall::core::naming::{derive_branch_name, sandbox_purpose};
use landfall::core::types::{BranchName, Namespace, TableName};

/// Strategy for generating valid identifier characters.
fn identifier_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
    ]
}

/// Strategy for generating valid identifiers.
fn valid_identifier() -> impl Strategy<Value = String> {
    prop::collection::vec(identifier_char(), 1..40).prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for generating user/purpose fragments that survive branch
/// name validation once joined.
fn name_fragment() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            prop::char::range('a', 'z'),
            prop::char::range('0', '9'),
            Just('-'),
            Just('_'),
        ],
        1..20,
    )
    .prop_filter_map("must not start with '-'", |chars| {
        let s: String = chars.into_iter().collect();
        if s.starts_with('-') {
            None
        } else {
            Some(s)
        }
    })
}

proptest! {
    /// Valid identifiers construct namespaces and table names, and
    /// round-trip through serde unchanged.
    #[test]
    fn identifiers_round_trip(name in valid_identifier()) {
        let table = TableName::new(name.clone()).unwrap();
        prop_assert_eq!(table.as_str(), name.as_str());

        let json = serde_json::to_string(&table).unwrap();
        let back: TableName = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, table);

        let ns = Namespace::new(name.clone()).unwrap();
        prop_assert_eq!(ns.as_str(), name.as_str());
    }

    /// Quote characters never survive identifier validation, no matter
    /// where they appear.
    #[test]
    fn stray_quotes_are_rejected(
        prefix in valid_identifier(),
        suffix in valid_identifier(),
        quote in prop::sample::select(vec!['\'', '"', '`']),
    ) {
        let name = format!("{}{}{}", prefix, quote, suffix);
        prop_assert!(TableName::new(name.clone()).is_err());
        prop_assert!(Namespace::new(name).is_err());
    }

    /// Derived branch names are always valid and carry the owning user
    /// and purpose in the documented layout.
    #[test]
    fn derived_branch_names_are_valid(user in name_fragment(), purpose in name_fragment()) {
        let branch = derive_branch_name(&user, &purpose).unwrap();
        prop_assert!(BranchName::new(branch.as_str()).is_ok());
        let expected_prefix = format!("{}.{}_", user, purpose);
        prop_assert!(branch.as_str().starts_with(&expected_prefix));
    }

    /// Two derivations for the same user and purpose never collide.
    #[test]
    fn derived_branch_names_are_unique(user in name_fragment(), purpose in name_fragment()) {
        let first = derive_branch_name(&user, &purpose).unwrap();
        let second = derive_branch_name(&user, &purpose).unwrap();
        prop_assert_ne!(first, second);
    }

    /// Sandbox purposes always produce derivable branch names.
    #[test]
    fn sandbox_purposes_derive(user in name_fragment(), subject in name_fragment()) {
        let purpose = sandbox_purpose(&subject);
        prop_assert!(derive_branch_name(&user, &purpose).is_ok());
    }

    /// Branch names never contain whitespace, control characters, or
    /// path traversal once constructed.
    #[test]
    fn branch_name_invariants(candidate in "\\PC{0,40}") {
        if let Ok(branch) = BranchName::new(candidate) {
            let s = branch.as_str();
            prop_assert!(!s.is_empty());
            prop_assert!(!s.contains(".."));
            prop_assert!(!s.chars().any(|c| c.is_whitespace() || c.is_control()));
            prop_assert!(!s.starts_with('.') && !s.starts_with('-'));
            prop_assert!(!s.ends_with('/'));
        }
    }
}
