//! catalog::traits
//!
//! Catalog trait definition for the versioned table store.
//!
//! # Design
//!
//! The `Catalog` trait is async because catalog operations involve
//! network I/O. Transport-level failures (network, auth, unknown refs)
//! surface as `CatalogError`. Import and merge additionally return a
//! *structured outcome*: the catalog plans and validates these
//! operations server-side and reports failure as data, not as an
//! exception. Orchestrators treat a failed outcome and a transport
//! error with the same retention policy, but the distinction matters
//! for the wire protocol.
//!
//! # Example
//!
//! ```ignore
//! use landfall::catalog::{Catalog, ImportOutcome, TableSpec};
//!
//! async fn land(catalog: &dyn Catalog, spec: &TableSpec, branch: &BranchName, uri: &str)
//!     -> Result<(), CatalogError>
//! {
//!     catalog.create_or_replace_table(spec, branch, uri).await?;
//!     match catalog.import_data(spec, branch, uri).await? {
//!         ImportOutcome::Success => Ok(()),
//!         ImportOutcome::Failed { message } => panic!("import rejected: {message}"),
//!     }
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{BranchName, Namespace, TableName};

/// Errors from catalog transport.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Authentication failed (invalid or expired API key).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// A table addressed within a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableSpec {
    /// Table name.
    pub table: TableName,
    /// Namespace containing the table.
    pub namespace: Namespace,
}

impl std::fmt::Display for TableSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.namespace, self.table)
    }
}

/// Structured outcome of an import operation.
///
/// A `Failed` outcome is a normal return value: the import plan was
/// accepted by the API but rejected during execution (schema mismatch,
/// unreadable source files, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// All files imported and committed on the branch.
    Success,
    /// The import was rejected; the branch holds no partial import.
    Failed {
        /// Error message reported by the catalog.
        message: String,
    },
}

/// Structured outcome of a merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// All table states from the source branch are now visible on the
    /// destination ref.
    Success,
    /// The merge was rejected, typically because of a conflicting
    /// concurrent write to the destination ref.
    Rejected {
        /// Error message reported by the catalog.
        message: String,
    },
}

/// The Catalog trait for the Git-like versioned table store.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async
/// tasks.
///
/// # Error Handling
///
/// Transport errors are `CatalogError`; logical rejection of imports
/// and merges is reported through [`ImportOutcome`] / [`MergeOutcome`].
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Get the catalog implementation name (e.g. "rest", "mock").
    fn name(&self) -> &'static str;

    /// Check whether a branch exists.
    async fn branch_exists(&self, branch: &BranchName) -> Result<bool, CatalogError>;

    /// Create a branch forked from `parent`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the parent ref does not exist
    /// - `ApiError` with status 409 if the branch already exists
    async fn create_branch(
        &self,
        branch: &BranchName,
        parent: &BranchName,
    ) -> Result<(), CatalogError>;

    /// Delete a branch.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the branch does not exist
    async fn delete_branch(&self, branch: &BranchName) -> Result<(), CatalogError>;

    /// Create the table on `branch`, replacing any existing definition.
    ///
    /// Input-port tables always use replace semantics: the table is the
    /// full snapshot for the cycle, not an append target across cycles.
    /// The source URI seeds the table schema.
    async fn create_or_replace_table(
        &self,
        spec: &TableSpec,
        branch: &BranchName,
        source_uri: &str,
    ) -> Result<(), CatalogError>;

    /// Import staged data files into the table on `branch`.
    ///
    /// Returns the structured outcome reported by the catalog; see
    /// [`ImportOutcome`].
    async fn import_data(
        &self,
        spec: &TableSpec,
        branch: &BranchName,
        source_uri: &str,
    ) -> Result<ImportOutcome, CatalogError>;

    /// Merge all table states committed on `source` into `into`.
    ///
    /// Returns the structured outcome reported by the catalog; see
    /// [`MergeOutcome`]. The merge operation is the only
    /// synchronization primitive in the system: conflicting concurrent
    /// merges are detected here and reported as `Rejected`.
    async fn merge_branch(
        &self,
        source: &BranchName,
        into: &BranchName,
    ) -> Result<MergeOutcome, CatalogError>;
}
