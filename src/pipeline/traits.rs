//! pipeline::traits
//!
//! Pipeline execution service trait.
//!
//! # Design
//!
//! The pipeline service runs a transformation project against a
//! specific catalog branch and namespace. The call is long-running; the
//! caller bounds the wait with `tokio::time::timeout` (see
//! [`crate::run::transform`]) rather than trusting the service to
//! enforce a deadline.
//!
//! Like the catalog, the service distinguishes transport errors
//! (`PipelineError`) from a run that executed and reported failure
//! ([`RunOutcome::Failed`]).

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{BranchName, JobId, Namespace};

/// Errors from pipeline service transport.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Authentication failed.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

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

/// Request to run a transformation pipeline.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Local path of the checked-out pipeline project.
    pub project_dir: PathBuf,
    /// Branch the run writes to.
    pub branch: BranchName,
    /// Namespace the run reads and writes in.
    pub namespace: Namespace,
    /// Run parameters, passed through to the pipeline verbatim.
    pub parameters: BTreeMap<String, String>,
}

/// Terminal state of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run completed and committed its outputs on the branch.
    Success {
        /// Job identifier, recorded for traceability.
        job_id: JobId,
    },
    /// The run executed but failed (model error, audit expectation
    /// violation, ...). The branch holds whatever the run committed
    /// before failing.
    Failed {
        /// Job identifier, when the service assigned one before failing.
        job_id: Option<JobId>,
        /// Error message reported by the service.
        message: String,
    },
}

/// The pipeline execution service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async
/// tasks.
#[async_trait]
pub trait PipelineService: Send + Sync {
    /// Get the service implementation name (e.g. "rest", "mock").
    fn name(&self) -> &'static str;

    /// Run the pipeline project and wait for its terminal state.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` for transport failures; a run that
    /// executed and failed is reported as [`RunOutcome::Failed`].
    async fn run(&self, request: RunRequest) -> Result<RunOutcome, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_error_display() {
        assert_eq!(
            format!("{}", PipelineError::AuthFailed("expired".into())),
            "authentication failed: expired"
        );
        assert_eq!(
            format!(
                "{}",
                PipelineError::ApiError {
                    status: 500,
                    message: "boom".into()
                }
            ),
            "API error: 500 - boom"
        );
        assert_eq!(
            format!("{}", PipelineError::NetworkError("refused".into())),
            "network error: refused"
        );
    }

    #[test]
    fn outcome_success_carries_job_id() {
        let outcome = RunOutcome::Success {
            job_id: JobId::new("job-1"),
        };
        assert!(matches!(
            outcome,
            RunOutcome::Success { ref job_id } if job_id.as_str() == "job-1"
        ));
    }
}
