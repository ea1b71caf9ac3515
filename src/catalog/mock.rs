//! catalog::mock
//!
//! Mock catalog implementation for deterministic testing.
//!
//! # Design
//!
//! The mock keeps the full branch/table state in memory: each branch
//! holds a map of tables to row counts, branches fork their parent's
//! state on creation, and merges copy table states into the
//! destination. That is enough to observe the properties that matter
//! to the orchestrators: trunk is unchanged until a merge lands, and a
//! retained branch still holds its unmerged state.
//!
//! Import resolves source URIs through the same [`SourceRegistry`] the
//! mock object store registers uploads in, so importing a URI that was
//! never uploaded fails with a structured error.
//!
//! Failure injection follows two axes, mirroring the wire protocol:
//! transport errors via [`FailOn`], structured rejections via
//! [`MockCatalog::reject_import`] / [`MockCatalog::reject_merge`].
//!
//! # Example
//!
//! ```
//! use landfall::catalog::mock::MockCatalog;
//! use landfall::catalog::Catalog;
//! use landfall::core::types::BranchName;
//! use landfall::storage::mock::SourceRegistry;
//!
//! # tokio_test::block_on(async {
//! let catalog = MockCatalog::new(SourceRegistry::new());
//! let main = BranchName::new("main").unwrap();
//! let branch = BranchName::new("jamie.ingestion_1").unwrap();
//!
//! catalog.create_branch(&branch, &main).await.unwrap();
//! assert!(catalog.branch_exists(&branch).await.unwrap());
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Catalog, CatalogError, ImportOutcome, MergeOutcome, TableSpec};
use crate::core::types::BranchName;
use crate::storage::mock::SourceRegistry;

/// Mock catalog for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockCatalog {
    registry: SourceRegistry,
    inner: Arc<Mutex<MockCatalogInner>>,
}

#[derive(Debug)]
struct MockCatalogInner {
    /// Branch state by name. Created with a `main` trunk.
    branches: HashMap<BranchName, BranchState>,
    /// Transport error injection.
    fail_on: Option<FailOn>,
    /// Structured import rejection message, if configured.
    import_rejection: Option<String>,
    /// Structured merge rejection message, if configured.
    merge_rejection: Option<String>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Per-branch table state: row count per table.
#[derive(Debug, Clone, Default)]
struct BranchState {
    tables: HashMap<TableSpec, u64>,
}

/// Configuration for which operation should fail with a transport error.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail branch_exists with the given error.
    BranchExists(CatalogError),
    /// Fail create_branch with the given error.
    CreateBranch(CatalogError),
    /// Fail delete_branch with the given error.
    DeleteBranch(CatalogError),
    /// Fail create_or_replace_table with the given error.
    CreateTable(CatalogError),
    /// Fail import_data with the given error.
    ImportData(CatalogError),
    /// Fail merge_branch with the given error.
    MergeBranch(CatalogError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone)]
pub enum MockOperation {
    BranchExists { branch: String },
    CreateBranch { branch: String, parent: String },
    DeleteBranch { branch: String },
    CreateTable { spec: String, branch: String },
    ImportData { spec: String, branch: String, uri: String },
    MergeBranch { source: String, into: String },
}

impl MockCatalog {
    /// Create a mock catalog with an empty `main` trunk.
    pub fn new(registry: SourceRegistry) -> Self {
        let mut branches = HashMap::new();
        branches.insert(
            BranchName::new("main").expect("static name"),
            BranchState::default(),
        );
        Self {
            registry,
            inner: Arc::new(Mutex::new(MockCatalogInner {
                branches,
                fail_on: None,
                import_rejection: None,
                merge_rejection: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Configure the mock to fail an operation with a transport error.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Configure every import to report a structured failure.
    pub fn reject_import(self, message: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.import_rejection = Some(message.into());
        }
        self
    }

    /// Configure every merge to report a structured rejection, as a
    /// conflicting concurrent write to the destination would.
    pub fn reject_merge(self, message: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.merge_rejection = Some(message.into());
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Check branch existence without going through the async trait
    /// (for test verification).
    pub fn has_branch_sync(&self, branch: &BranchName) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.branches.contains_key(branch)
    }

    /// Get the row count of a table on a branch (for test verification).
    pub fn table_rows(&self, branch: &BranchName, spec: &TableSpec) -> Option<u64> {
        let inner = self.inner.lock().unwrap();
        inner.branches.get(branch)?.tables.get(spec).copied()
    }

    /// Names of all branches currently in the catalog.
    pub fn branch_names(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.branches.keys().map(|b| b.to_string()).collect()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    fn check_fail<T>(&self, expected: &str) -> Option<Result<T, CatalogError>> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::BranchExists(e)) if expected == "branch_exists" => Some(Err(e.clone())),
            Some(FailOn::CreateBranch(e)) if expected == "create_branch" => Some(Err(e.clone())),
            Some(FailOn::DeleteBranch(e)) if expected == "delete_branch" => Some(Err(e.clone())),
            Some(FailOn::CreateTable(e)) if expected == "create_table" => Some(Err(e.clone())),
            Some(FailOn::ImportData(e)) if expected == "import_data" => Some(Err(e.clone())),
            Some(FailOn::MergeBranch(e)) if expected == "merge_branch" => Some(Err(e.clone())),
            _ => None,
        }
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn branch_exists(&self, branch: &BranchName) -> Result<bool, CatalogError> {
        self.record(MockOperation::BranchExists {
            branch: branch.to_string(),
        });
        if let Some(result) = self.check_fail("branch_exists") {
            return result;
        }

        let inner = self.inner.lock().unwrap();
        Ok(inner.branches.contains_key(branch))
    }

    async fn create_branch(
        &self,
        branch: &BranchName,
        parent: &BranchName,
    ) -> Result<(), CatalogError> {
        self.record(MockOperation::CreateBranch {
            branch: branch.to_string(),
            parent: parent.to_string(),
        });
        if let Some(result) = self.check_fail("create_branch") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        let parent_state = inner
            .branches
            .get(parent)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("parent ref '{}'", parent)))?;
        if inner.branches.contains_key(branch) {
            return Err(CatalogError::ApiError {
                status: 409,
                message: format!("branch '{}' already exists", branch),
            });
        }
        // Forking snapshots the parent's table state.
        inner.branches.insert(branch.clone(), parent_state);
        Ok(())
    }

    async fn delete_branch(&self, branch: &BranchName) -> Result<(), CatalogError> {
        self.record(MockOperation::DeleteBranch {
            branch: branch.to_string(),
        });
        if let Some(result) = self.check_fail("delete_branch") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        inner
            .branches
            .remove(branch)
            .map(|_| ())
            .ok_or_else(|| CatalogError::NotFound(format!("branch '{}'", branch)))
    }

    async fn create_or_replace_table(
        &self,
        spec: &TableSpec,
        branch: &BranchName,
        _source_uri: &str,
    ) -> Result<(), CatalogError> {
        self.record(MockOperation::CreateTable {
            spec: spec.to_string(),
            branch: branch.to_string(),
        });
        if let Some(result) = self.check_fail("create_table") {
            return result;
        }

        let mut inner = self.inner.lock().unwrap();
        let state = inner
            .branches
            .get_mut(branch)
            .ok_or_else(|| CatalogError::NotFound(format!("branch '{}'", branch)))?;
        // Replace semantics: any existing rows are dropped.
        state.tables.insert(spec.clone(), 0);
        Ok(())
    }

    async fn import_data(
        &self,
        spec: &TableSpec,
        branch: &BranchName,
        source_uri: &str,
    ) -> Result<ImportOutcome, CatalogError> {
        self.record(MockOperation::ImportData {
            spec: spec.to_string(),
            branch: branch.to_string(),
            uri: source_uri.to_string(),
        });
        if let Some(result) = self.check_fail("import_data") {
            return result;
        }

        {
            let inner = self.inner.lock().unwrap();
            if let Some(message) = &inner.import_rejection {
                return Ok(ImportOutcome::Failed {
                    message: message.clone(),
                });
            }
        }

        let rows = match self.registry.rows_for(source_uri) {
            Some(rows) => rows,
            None => {
                // The source was never staged: the import plan cannot
                // read it. Structured failure, not a transport error.
                return Ok(ImportOutcome::Failed {
                    message: format!("source not readable: {}", source_uri),
                });
            }
        };

        let mut inner = self.inner.lock().unwrap();
        let state = inner
            .branches
            .get_mut(branch)
            .ok_or_else(|| CatalogError::NotFound(format!("branch '{}'", branch)))?;
        match state.tables.get_mut(spec) {
            Some(count) => {
                *count += rows;
                Ok(ImportOutcome::Success)
            }
            None => Ok(ImportOutcome::Failed {
                message: format!("table '{}' not found on branch '{}'", spec, branch),
            }),
        }
    }

    async fn merge_branch(
        &self,
        source: &BranchName,
        into: &BranchName,
    ) -> Result<MergeOutcome, CatalogError> {
        self.record(MockOperation::MergeBranch {
            source: source.to_string(),
            into: into.to_string(),
        });
        if let Some(result) = self.check_fail("merge_branch") {
            return result;
        }

        {
            let inner = self.inner.lock().unwrap();
            if let Some(message) = &inner.merge_rejection {
                return Ok(MergeOutcome::Rejected {
                    message: message.clone(),
                });
            }
        }

        let mut inner = self.inner.lock().unwrap();
        let source_state = inner
            .branches
            .get(source)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("branch '{}'", source)))?;
        let dest_state = inner
            .branches
            .get_mut(into)
            .ok_or_else(|| CatalogError::NotFound(format!("branch '{}'", into)))?;
        // All table states transition at once; consumers never observe
        // a partial merge.
        for (spec, rows) in source_state.tables {
            dest_state.tables.insert(spec, rows);
        }
        Ok(MergeOutcome::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Namespace, TableName};

    fn main_branch() -> BranchName {
        BranchName::new("main").unwrap()
    }

    fn spec() -> TableSpec {
        TableSpec {
            table: TableName::new("trips").unwrap(),
            namespace: Namespace::new("tlc_trip_record").unwrap(),
        }
    }

    #[tokio::test]
    async fn create_branch_forks_parent_state() {
        let registry = SourceRegistry::new();
        registry.register("s3://b/seed", 5);
        let catalog = MockCatalog::new(registry);
        let branch = BranchName::new("jamie.ingestion_1").unwrap();

        catalog.create_branch(&branch, &main_branch()).await.unwrap();
        catalog
            .create_or_replace_table(&spec(), &branch, "s3://b/seed")
            .await
            .unwrap();
        catalog
            .import_data(&spec(), &branch, "s3://b/seed")
            .await
            .unwrap();

        let child = BranchName::new("jamie.sandbox_trips_1").unwrap();
        catalog.create_branch(&child, &branch).await.unwrap();
        assert_eq!(catalog.table_rows(&child, &spec()), Some(5));
    }

    #[tokio::test]
    async fn create_existing_branch_conflicts() {
        let catalog = MockCatalog::new(SourceRegistry::new());
        let branch = BranchName::new("jamie.ingestion_1").unwrap();

        catalog.create_branch(&branch, &main_branch()).await.unwrap();
        let result = catalog.create_branch(&branch, &main_branch()).await;
        assert!(matches!(
            result,
            Err(CatalogError::ApiError { status: 409, .. })
        ));
    }

    #[tokio::test]
    async fn create_branch_from_missing_parent_fails() {
        let catalog = MockCatalog::new(SourceRegistry::new());
        let branch = BranchName::new("jamie.ingestion_1").unwrap();
        let missing = BranchName::new("nope").unwrap();

        let result = catalog.create_branch(&branch, &missing).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn import_unstaged_uri_fails_structurally() {
        let catalog = MockCatalog::new(SourceRegistry::new());
        let branch = BranchName::new("jamie.ingestion_1").unwrap();
        catalog.create_branch(&branch, &main_branch()).await.unwrap();
        catalog
            .create_or_replace_table(&spec(), &branch, "s3://b/missing")
            .await
            .unwrap();

        let outcome = catalog
            .import_data(&spec(), &branch, "s3://b/missing")
            .await
            .unwrap();
        assert!(matches!(outcome, ImportOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn merge_copies_tables_to_destination() {
        let registry = SourceRegistry::new();
        registry.register("s3://b/data", 1000);
        let catalog = MockCatalog::new(registry);
        let branch = BranchName::new("jamie.ingestion_1").unwrap();

        catalog.create_branch(&branch, &main_branch()).await.unwrap();
        catalog
            .create_or_replace_table(&spec(), &branch, "s3://b/data")
            .await
            .unwrap();
        catalog
            .import_data(&spec(), &branch, "s3://b/data")
            .await
            .unwrap();

        // Trunk does not see branch state before the merge.
        assert_eq!(catalog.table_rows(&main_branch(), &spec()), None);

        let outcome = catalog.merge_branch(&branch, &main_branch()).await.unwrap();
        assert_eq!(outcome, MergeOutcome::Success);
        assert_eq!(catalog.table_rows(&main_branch(), &spec()), Some(1000));
    }

    #[tokio::test]
    async fn rejected_merge_leaves_destination_unchanged() {
        let registry = SourceRegistry::new();
        registry.register("s3://b/data", 10);
        let catalog = MockCatalog::new(registry).reject_merge("conflicting concurrent write");
        let branch = BranchName::new("jamie.ingestion_1").unwrap();

        catalog.create_branch(&branch, &main_branch()).await.unwrap();
        catalog
            .create_or_replace_table(&spec(), &branch, "s3://b/data")
            .await
            .unwrap();
        catalog
            .import_data(&spec(), &branch, "s3://b/data")
            .await
            .unwrap();

        let outcome = catalog.merge_branch(&branch, &main_branch()).await.unwrap();
        assert!(matches!(outcome, MergeOutcome::Rejected { .. }));
        assert_eq!(catalog.table_rows(&main_branch(), &spec()), None);
    }

    #[tokio::test]
    async fn delete_missing_branch_fails() {
        let catalog = MockCatalog::new(SourceRegistry::new());
        let missing = BranchName::new("jamie.ingestion_1").unwrap();
        let result = catalog.delete_branch(&missing).await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn fail_on_injects_transport_errors() {
        let catalog = MockCatalog::new(SourceRegistry::new()).fail_on(FailOn::CreateBranch(
            CatalogError::NetworkError("unreachable".into()),
        ));
        let branch = BranchName::new("jamie.ingestion_1").unwrap();
        let result = catalog.create_branch(&branch, &main_branch()).await;
        assert!(matches!(result, Err(CatalogError::NetworkError(_))));
    }

    #[tokio::test]
    async fn operations_recorded_in_order() {
        let catalog = MockCatalog::new(SourceRegistry::new());
        let branch = BranchName::new("jamie.ingestion_1").unwrap();

        catalog.branch_exists(&branch).await.unwrap();
        catalog.create_branch(&branch, &main_branch()).await.unwrap();

        let ops = catalog.operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], MockOperation::BranchExists { .. }));
        assert!(matches!(ops[1], MockOperation::CreateBranch { .. }));
    }
}
