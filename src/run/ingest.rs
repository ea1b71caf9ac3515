//! run::ingest
//!
//! The ingestion orchestrator.
//!
//! # Design
//!
//! Ingestion lands one generated batch on the trunk through a branch
//! transaction: stage the payload in object storage, fork an isolated
//! branch, replace the input-port table there, import the staged URI,
//! and commit. Every catalog write happens on the isolated branch; the
//! trunk only ever sees the batch through a successful merge.
//!
//! A structured import failure is propagated as
//! [`IngestError::DataImport`] with the branch left in place. Deleting
//! the branch here would discard the only evidence of what the catalog
//! rejected; the caller decides what to do with it.

use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Catalog, CatalogError, ImportOutcome, TableSpec};
use crate::core::config::Config;
use crate::core::types::BranchName;
use crate::generate::DataGenerator;
use crate::storage::{ObjectStore, StorageError};
use crate::wap::{BranchTxn, WapError};

/// Errors from an ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Staging the batch in object storage failed.
    #[error("failed to stage batch: {0}")]
    Storage(#[from] StorageError),

    /// A catalog call failed at the transport level.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The catalog reported a structured import failure. The staging
    /// branch is left in place for diagnosis.
    #[error("import into '{branch}' failed: {message}")]
    DataImport {
        /// Branch the import was running on
        branch: BranchName,
        /// Failure message reported by the catalog
        message: String,
    },

    /// A branch transaction step failed.
    #[error(transparent)]
    Wap(#[from] WapError),
}

/// Orchestrates one write-audit-publish ingestion cycle.
pub struct IngestionOrchestrator<'a> {
    catalog: &'a dyn Catalog,
    store: &'a dyn ObjectStore,
    generator: &'a dyn DataGenerator,
    config: &'a Config,
}

impl<'a> IngestionOrchestrator<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        store: &'a dyn ObjectStore,
        generator: &'a dyn DataGenerator,
        config: &'a Config,
    ) -> Self {
        Self {
            catalog,
            store,
            generator,
            config,
        }
    }

    /// Run one ingestion cycle for `trip_date`. Returns the number of
    /// rows landed on the trunk.
    ///
    /// # Errors
    ///
    /// Any step failing aborts the run. The upload happens before any
    /// branch exists; failures after `begin_isolated` leave the branch
    /// behind, except a rejected merge which is reported through
    /// [`WapError::Merge`] with the same retention.
    pub async fn run(&self, trip_date: &str) -> Result<u64, IngestError> {
        let batch = self.generator.generate(trip_date);
        let key = format!("{}/{}.ndjson", self.config.data_folder, Uuid::new_v4());
        let uri = self
            .store
            .put(&batch.bytes, &self.config.bucket, &key)
            .await?;
        tracing::info!(rows = batch.rows, %uri, "Batch staged");

        let trunk = BranchName::new(&self.config.trunk).map_err(WapError::from)?;
        let txn =
            BranchTxn::begin_isolated(self.catalog, &self.config.user, "ingestion", &trunk).await?;

        let spec = TableSpec {
            table: self.config.input_port_table.clone(),
            namespace: self.config.input_port_namespace.clone(),
        };
        self.catalog
            .create_or_replace_table(&spec, txn.branch(), &uri)
            .await?;

        match self.catalog.import_data(&spec, txn.branch(), &uri).await? {
            ImportOutcome::Success => {}
            ImportOutcome::Failed { message } => {
                return Err(IngestError::DataImport {
                    branch: txn.retain(),
                    message,
                });
            }
        }
        tracing::info!(table = %spec, branch = %txn.branch(), "Batch imported");

        txn.commit(self.catalog).await?;
        Ok(batch.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::{FailOn, MockCatalog, MockOperation};
    use crate::generate::TripBatchGenerator;
    use crate::storage::mock::{MockObjectStore, SourceRegistry};

    fn config() -> Config {
        Config::for_tests()
    }

    fn generator() -> TripBatchGenerator {
        TripBatchGenerator::with_rows(
            vec!["Tip_amount".to_string(), "Tolls_amount".to_string()],
            10,
        )
    }

    #[tokio::test]
    async fn successful_run_lands_rows_on_trunk() {
        let registry = SourceRegistry::new();
        let catalog = MockCatalog::new(registry.clone());
        let store = MockObjectStore::new(registry);
        let config = config();
        let generator = generator();

        let orchestrator = IngestionOrchestrator::new(&catalog, &store, &generator, &config);
        let rows = orchestrator.run("30/08/2026").await.unwrap();
        assert_eq!(rows, 10);

        // The staging branch was merged and deleted; only the trunk
        // remains, carrying the imported rows.
        assert_eq!(catalog.branch_names(), vec!["main".to_string()]);
        let trunk = BranchName::new("main").unwrap();
        let spec = TableSpec {
            table: config.input_port_table.clone(),
            namespace: config.input_port_namespace.clone(),
        };
        assert_eq!(catalog.table_rows(&trunk, &spec), Some(10));
    }

    #[tokio::test]
    async fn upload_happens_before_import() {
        let registry = SourceRegistry::new();
        let catalog = MockCatalog::new(registry.clone());
        let store = MockObjectStore::new(registry);
        let config = config();
        let generator = generator();

        IngestionOrchestrator::new(&catalog, &store, &generator, &config)
            .run("30/08/2026")
            .await
            .unwrap();

        let uploads = store.uploads();
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].key.starts_with("raw/"));
        assert!(uploads[0].key.ends_with(".ndjson"));

        // Import resolved the uploaded URI; an import of a URI the
        // store never acknowledged would have failed.
        let imported = catalog.operations().into_iter().any(|op| {
            matches!(op, MockOperation::ImportData { uri, .. }
                if uri.ends_with(&uploads[0].key))
        });
        assert!(imported);
    }

    #[tokio::test]
    async fn storage_failure_creates_no_branch() {
        let registry = SourceRegistry::new();
        let catalog = MockCatalog::new(registry.clone());
        let store =
            MockObjectStore::new(registry).fail_with(StorageError::NetworkError("refused".into()));
        let config = config();
        let generator = generator();

        let result = IngestionOrchestrator::new(&catalog, &store, &generator, &config)
            .run("30/08/2026")
            .await;
        assert!(matches!(result, Err(IngestError::Storage(_))));
        assert!(catalog.operations().is_empty());
    }

    #[tokio::test]
    async fn import_failure_keeps_branch_and_trunk_untouched() {
        let registry = SourceRegistry::new();
        let catalog = MockCatalog::new(registry.clone()).reject_import("schema mismatch");
        let store = MockObjectStore::new(registry);
        let config = config();
        let generator = generator();

        let result = IngestionOrchestrator::new(&catalog, &store, &generator, &config)
            .run("30/08/2026")
            .await;

        let branch = match result {
            Err(IngestError::DataImport { branch, message }) => {
                assert_eq!(message, "schema mismatch");
                branch
            }
            other => panic!("expected DataImport, got {:?}", other),
        };

        // Branch retained, nothing merged.
        assert!(catalog.has_branch_sync(&branch));
        let trunk = BranchName::new("main").unwrap();
        let spec = TableSpec {
            table: config.input_port_table.clone(),
            namespace: config.input_port_namespace.clone(),
        };
        assert_eq!(catalog.table_rows(&trunk, &spec), None);
    }

    #[tokio::test]
    async fn rejected_merge_keeps_branch() {
        let registry = SourceRegistry::new();
        let catalog = MockCatalog::new(registry.clone()).reject_merge("concurrent trunk write");
        let store = MockObjectStore::new(registry);
        let config = config();
        let generator = generator();

        let result = IngestionOrchestrator::new(&catalog, &store, &generator, &config)
            .run("30/08/2026")
            .await;
        match result {
            Err(IngestError::Wap(WapError::Merge { branch, .. })) => {
                assert!(catalog.has_branch_sync(&branch));
            }
            other => panic!("expected merge rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn branch_creation_failure_aborts_before_table_work() {
        let registry = SourceRegistry::new();
        let catalog = MockCatalog::new(registry.clone()).fail_on(FailOn::CreateBranch(
            CatalogError::ApiError {
                status: 503,
                message: "unavailable".into(),
            },
        ));
        let store = MockObjectStore::new(registry);
        let config = config();
        let generator = generator();

        let result = IngestionOrchestrator::new(&catalog, &store, &generator, &config)
            .run("30/08/2026")
            .await;
        assert!(matches!(
            result,
            Err(IngestError::Wap(WapError::BranchCreation(_)))
        ));
        let touched_tables = catalog
            .operations()
            .into_iter()
            .any(|op| matches!(op, MockOperation::CreateTable { .. }));
        assert!(!touched_tables);
    }
}
