//! core::naming
//!
//! Branch naming rules for orchestrator-owned branches.
//!
//! # Convention
//!
//! Every branch created by an orchestrator is named
//! `<user>.<purpose>_<random-id>`. The user scopes the branch to its
//! owner, the purpose says which workflow created it (`ingestion`,
//! `sandbox_<subject>`, ...), and the random suffix guarantees that two
//! concurrent runs never touch the same branch.

use uuid::Uuid;

use super::types::{BranchName, TypeError};

/// Derive a fresh orchestrator branch name.
///
/// The random suffix is a v4 UUID, so a collision in practice means a
/// leftover branch from an identically-seeded earlier run, not a
/// concurrent one. Callers handle that case with delete-then-create
/// (see [`crate::wap::BranchTxn::begin_isolated`]).
///
/// # Errors
///
/// Returns `TypeError::InvalidBranchName` if `user` or `purpose`
/// contain characters that are invalid in a branch name.
///
/// # Example
///
/// ```
/// use landfall::core::naming::derive_branch_name;
///
/// let name = derive_branch_name("jamie", "ingestion").unwrap();
/// assert!(name.as_str().starts_with("jamie.ingestion_"));
/// ```
pub fn derive_branch_name(user: &str, purpose: &str) -> Result<BranchName, TypeError> {
    BranchName::new(format!("{}.{}_{}", user, purpose, Uuid::new_v4()))
}

/// Build the purpose slug for a transformation sandbox branch.
///
/// # Example
///
/// ```
/// use landfall::core::naming::sandbox_purpose;
///
/// assert_eq!(sandbox_purpose("trips"), "sandbox_trips");
/// ```
pub fn sandbox_purpose(subject: &str) -> String {
    format!("sandbox_{}", subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_user_scoped_name() {
        let name = derive_branch_name("jamie", "ingestion").unwrap();
        assert!(name.as_str().starts_with("jamie.ingestion_"));
    }

    #[test]
    fn suffix_is_fresh_per_call() {
        let a = derive_branch_name("jamie", "ingestion").unwrap();
        let b = derive_branch_name("jamie", "ingestion").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_user_is_rejected() {
        assert!(derive_branch_name("bad user", "ingestion").is_err());
        assert!(derive_branch_name("", "ingestion").is_err());
    }

    #[test]
    fn sandbox_purpose_embeds_subject() {
        assert_eq!(sandbox_purpose("trips"), "sandbox_trips");
        let name = derive_branch_name("jamie", &sandbox_purpose("trips")).unwrap();
        assert!(name.as_str().starts_with("jamie.sandbox_trips_"));
    }
}
