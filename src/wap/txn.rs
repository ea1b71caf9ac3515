//! wap::txn
//!
//! The branch-scoped transaction primitive.
//!
//! # Design
//!
//! Both orchestrators use the same envelope: create an isolated branch
//! off the trunk, do work on it, then either publish the work with
//! [`BranchTxn::commit`] (merge, then delete) or dispose of the branch
//! with [`BranchTxn::abandon`] (delete without merging) or
//! [`BranchTxn::retain`] (leave it for inspection).
//!
//! The terminal methods take `self`, so a branch can reach exactly one
//! terminal state per transaction; committing or abandoning twice is a
//! compile error, not a runtime check.
//!
//! # State machine
//!
//! ```text
//! absent --begin_isolated--> created --commit--> merged + deleted
//!                              |        \--(merge rejected)--> retained
//!                              |--abandon--> deleted, unmerged
//!                              \--retain---> retained, unmerged
//! ```
//!
//! `created` is the only state work executes in. On merge rejection the
//! branch is deliberately NOT deleted: the failed state is evidence,
//! and losing it is worse than accumulating branches.

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, MergeOutcome};
use crate::core::naming::derive_branch_name;
use crate::core::types::{BranchName, TypeError};

/// Errors from branch transactions.
#[derive(Debug, Error)]
pub enum WapError {
    /// The isolated branch could not be created.
    #[error("branch creation failed: {0}")]
    BranchCreation(#[source] CatalogError),

    /// The merge into the parent ref was rejected. The branch is
    /// retained.
    #[error("merge of '{branch}' into '{into}' rejected: {message}")]
    Merge {
        /// Source branch that failed to merge
        branch: BranchName,
        /// Destination ref
        into: BranchName,
        /// Rejection message from the catalog
        message: String,
    },

    /// Catalog transport failure outside branch creation and merge
    /// rejection.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The derived branch name was invalid (bad user or purpose).
    #[error(transparent)]
    InvalidName(#[from] TypeError),
}

/// An isolated branch with exactly one terminal disposition.
///
/// Created by [`BranchTxn::begin_isolated`]. The transaction owns the
/// branch's merge/delete decision; no other component may dispose of a
/// branch it did not create.
#[derive(Debug)]
pub struct BranchTxn {
    branch: BranchName,
    parent: BranchName,
}

impl BranchTxn {
    /// Create a fresh isolated branch named `<user>.<purpose>_<uuid>`
    /// forked from `parent`.
    ///
    /// If a branch with the derived name already exists — a collision,
    /// or a leftover from an identically-seeded earlier run — it is
    /// deleted first, so re-runs never fail on stale artifacts of the
    /// same logical slot.
    ///
    /// # Errors
    ///
    /// Returns `WapError::BranchCreation` if the catalog rejects any
    /// step (for example, a missing parent ref).
    pub async fn begin_isolated(
        catalog: &dyn Catalog,
        user: &str,
        purpose: &str,
        parent: &BranchName,
    ) -> Result<Self, WapError> {
        let branch = derive_branch_name(user, purpose)?;
        Self::begin_isolated_named(catalog, branch, parent).await
    }

    /// [`begin_isolated`](Self::begin_isolated) with a caller-supplied
    /// name. The delete-then-create behavior is identical.
    pub async fn begin_isolated_named(
        catalog: &dyn Catalog,
        branch: BranchName,
        parent: &BranchName,
    ) -> Result<Self, WapError> {
        let stale = catalog
            .branch_exists(&branch)
            .await
            .map_err(WapError::BranchCreation)?;
        if stale {
            tracing::warn!(branch = %branch, "Deleting stale branch before recreation");
            catalog
                .delete_branch(&branch)
                .await
                .map_err(WapError::BranchCreation)?;
        }

        catalog
            .create_branch(&branch, parent)
            .await
            .map_err(WapError::BranchCreation)?;
        tracing::info!(branch = %branch, parent = %parent, "Branch created");

        Ok(Self {
            branch,
            parent: parent.clone(),
        })
    }

    /// The branch this transaction owns.
    pub fn branch(&self) -> &BranchName {
        &self.branch
    }

    /// The ref a commit merges into.
    pub fn parent(&self) -> &BranchName {
        &self.parent
    }

    /// Publish: merge the branch into its parent ref, then delete it.
    ///
    /// # Errors
    ///
    /// Returns `WapError::Merge` if the catalog rejects the merge (for
    /// example, a conflicting concurrent write to the parent). On any
    /// merge failure the branch is NOT deleted; its state stays
    /// available for diagnosis, the same policy as an audit failure.
    pub async fn commit(self, catalog: &dyn Catalog) -> Result<(), WapError> {
        match catalog.merge_branch(&self.branch, &self.parent).await? {
            MergeOutcome::Success => {}
            MergeOutcome::Rejected { message } => {
                tracing::error!(branch = %self.branch, into = %self.parent, %message,
                    "Merge rejected; branch retained");
                return Err(WapError::Merge {
                    branch: self.branch,
                    into: self.parent,
                    message,
                });
            }
        }
        tracing::info!(branch = %self.branch, into = %self.parent, "Branch merged");

        catalog.delete_branch(&self.branch).await?;
        tracing::info!(branch = %self.branch, "Branch deleted");
        Ok(())
    }

    /// Discard: delete the branch without merging.
    ///
    /// Only for branches whose failure needs no investigation (staging
    /// branches for mechanically-generated data). Never use this for a
    /// branch carrying transformation results pending audit.
    pub async fn abandon(self, catalog: &dyn Catalog) -> Result<(), WapError> {
        catalog.delete_branch(&self.branch).await?;
        tracing::info!(branch = %self.branch, "Branch abandoned");
        Ok(())
    }

    /// Keep: leave the branch behind, unmerged, for inspection.
    ///
    /// This is a terminal action, not an error. Returns the branch
    /// name so the caller can report where the evidence lives.
    pub fn retain(self) -> BranchName {
        tracing::warn!(branch = %self.branch, "Branch retained for inspection");
        self.branch
    }
}
