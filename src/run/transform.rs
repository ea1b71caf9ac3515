//! run::transform
//!
//! The transformation orchestrator.
//!
//! # Design
//!
//! Transformation runs the data product's pipeline on an isolated
//! sandbox branch and publishes only runs whose in-pipeline audits
//! passed. The cleanup policy is the opposite of ingestion's: any
//! failure after the branch exists — execution error, client-side
//! timeout, rejected merge — retains the branch. The failed state is
//! the debugging artifact; a fresh branch name next cycle means
//! retention never blocks re-runs.
//!
//! The pipeline call itself has no deadline; the orchestrator bounds
//! the wait with `tokio::time::timeout` so a hung run cannot stall the
//! cycle past the configured client timeout.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::Catalog;
use crate::core::config::Config;
use crate::core::naming::sandbox_purpose;
use crate::core::types::{BranchName, JobId};
use crate::pipeline::{PipelineService, RunOutcome, RunRequest};
use crate::source::{CodeSource, SetupError};
use crate::wap::{BranchTxn, WapError};

/// Errors from a transformation run.
///
/// Variants carrying a `branch` name indicate the sandbox branch was
/// retained for inspection.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Checking out the transformation project failed. No branch was
    /// created.
    #[error("project setup failed: {0}")]
    Setup(#[from] SetupError),

    /// The pipeline run did not finish within the client timeout.
    #[error("pipeline run on '{branch}' exceeded {}s; branch retained", timeout.as_secs())]
    PipelineTimeout {
        /// Retained sandbox branch
        branch: BranchName,
        /// The deadline that elapsed
        timeout: Duration,
    },

    /// The pipeline run failed, either reporting a failed terminal
    /// state or dying at the transport level.
    #[error("pipeline run on '{branch}' failed: {message}; branch retained")]
    PipelineExecution {
        /// Retained sandbox branch
        branch: BranchName,
        /// Job id, when the run got far enough to be assigned one
        job_id: Option<JobId>,
        /// Failure message
        message: String,
    },

    /// The audited run could not be merged into the trunk.
    #[error("merge of '{branch}' rejected: {message}; branch retained")]
    Merge {
        /// Retained sandbox branch
        branch: BranchName,
        /// Rejection message from the catalog
        message: String,
    },

    /// A branch transaction step failed outside the merge path.
    #[error(transparent)]
    Wap(#[from] WapError),
}

/// Orchestrates one sandboxed transformation run.
pub struct TransformOrchestrator<'a> {
    catalog: &'a dyn Catalog,
    pipeline: &'a dyn PipelineService,
    source: &'a CodeSource,
    config: &'a Config,
}

impl<'a> TransformOrchestrator<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        pipeline: &'a dyn PipelineService,
        source: &'a CodeSource,
        config: &'a Config,
    ) -> Self {
        Self {
            catalog,
            pipeline,
            source,
            config,
        }
    }

    /// Run the transformation pipeline on a fresh sandbox branch and
    /// publish the result. Returns the job id of the merged run.
    ///
    /// # Errors
    ///
    /// `Setup` failures happen before any branch exists. All later
    /// failures retain the sandbox branch; the error names it.
    pub async fn run(
        &self,
        parameters: BTreeMap<String, String>,
    ) -> Result<JobId, TransformError> {
        // Validate the checkout before touching the catalog, so a bad
        // deploy never leaves an empty sandbox branch behind.
        let project = self.source.checkout()?;

        let trunk = BranchName::new(&self.config.trunk).map_err(WapError::from)?;
        let purpose = sandbox_purpose(self.config.input_port_table.as_str());
        let txn =
            BranchTxn::begin_isolated(self.catalog, &self.config.user, &purpose, &trunk).await?;

        let request = RunRequest {
            project_dir: project.pipeline_dir().to_path_buf(),
            branch: txn.branch().clone(),
            namespace: self.config.input_port_namespace.clone(),
            parameters,
        };

        let outcome =
            match tokio::time::timeout(self.config.client_timeout, self.pipeline.run(request))
                .await
            {
                Err(_elapsed) => {
                    return Err(TransformError::PipelineTimeout {
                        branch: txn.retain(),
                        timeout: self.config.client_timeout,
                    });
                }
                Ok(Err(transport)) => {
                    return Err(TransformError::PipelineExecution {
                        branch: txn.retain(),
                        job_id: None,
                        message: transport.to_string(),
                    });
                }
                Ok(Ok(outcome)) => outcome,
            };

        let job_id = match outcome {
            RunOutcome::Success { job_id } => job_id,
            RunOutcome::Failed { job_id, message } => {
                return Err(TransformError::PipelineExecution {
                    branch: txn.retain(),
                    job_id,
                    message,
                });
            }
        };
        tracing::info!(job_id = %job_id, branch = %txn.branch(), "Pipeline run succeeded");

        match txn.commit(self.catalog).await {
            Ok(()) => Ok(job_id),
            Err(WapError::Merge {
                branch, message, ..
            }) => Err(TransformError::Merge { branch, message }),
            Err(other) => Err(TransformError::Wap(other)),
        }
    }
}
