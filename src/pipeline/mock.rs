//! pipeline::mock
//!
//! Mock pipeline service for deterministic testing.
//!
//! # Design
//!
//! The mock resolves to a configured outcome after an optional delay.
//! The delay uses `tokio::time::sleep`, so timeout behavior is testable
//! without real waiting under `#[tokio::test(start_paused = true)]`.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::traits::{PipelineError, PipelineService, RunOutcome, RunRequest};
use crate::core::types::JobId;

/// Recorded run for test verification.
#[derive(Debug, Clone)]
pub struct MockRun {
    pub branch: String,
    pub namespace: String,
    pub project_dir: std::path::PathBuf,
}

/// What the next run should resolve to.
#[derive(Debug, Clone)]
enum Resolution {
    Succeed,
    FailRun(String),
    FailTransport(PipelineError),
}

/// Mock pipeline service.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockPipelineService {
    inner: Arc<Mutex<MockPipelineInner>>,
}

#[derive(Debug)]
struct MockPipelineInner {
    resolution: Resolution,
    delay: Duration,
    next_job: u64,
    runs: Vec<MockRun>,
}

impl MockPipelineService {
    /// Create a mock that succeeds immediately.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockPipelineInner {
                resolution: Resolution::Succeed,
                delay: Duration::ZERO,
                next_job: 1,
                runs: Vec::new(),
            })),
        }
    }

    /// Configure runs to execute and report failure.
    pub fn fail_run(self, message: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.resolution = Resolution::FailRun(message.into());
        }
        self
    }

    /// Configure runs to fail at the transport level.
    pub fn fail_transport(self, error: PipelineError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.resolution = Resolution::FailTransport(error);
        }
        self
    }

    /// Configure runs to take `delay` before resolving.
    pub fn with_delay(self, delay: Duration) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.delay = delay;
        }
        self
    }

    /// Get all recorded runs.
    pub fn runs(&self) -> Vec<MockRun> {
        let inner = self.inner.lock().unwrap();
        inner.runs.clone()
    }
}

impl Default for MockPipelineService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineService for MockPipelineService {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn run(&self, request: RunRequest) -> Result<RunOutcome, PipelineError> {
        let (resolution, delay, job_id) = {
            let mut inner = self.inner.lock().unwrap();
            inner.runs.push(MockRun {
                branch: request.branch.to_string(),
                namespace: request.namespace.to_string(),
                project_dir: request.project_dir.clone(),
            });
            let job = inner.next_job;
            inner.next_job += 1;
            (
                inner.resolution.clone(),
                inner.delay,
                JobId::new(format!("job-{}", job)),
            )
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match resolution {
            Resolution::Succeed => Ok(RunOutcome::Success { job_id }),
            Resolution::FailRun(message) => Ok(RunOutcome::Failed {
                job_id: Some(job_id),
                message,
            }),
            Resolution::FailTransport(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{BranchName, Namespace};
    use std::collections::BTreeMap;

    fn request() -> RunRequest {
        RunRequest {
            project_dir: std::path::PathBuf::from("/tmp/project"),
            branch: BranchName::new("jamie.sandbox_trips_1").unwrap(),
            namespace: Namespace::new("tlc_trip_record").unwrap(),
            parameters: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn succeeds_with_sequential_job_ids() {
        let service = MockPipelineService::new();
        let first = service.run(request()).await.unwrap();
        let second = service.run(request()).await.unwrap();
        assert_eq!(
            first,
            RunOutcome::Success {
                job_id: JobId::new("job-1")
            }
        );
        assert_eq!(
            second,
            RunOutcome::Success {
                job_id: JobId::new("job-2")
            }
        );
    }

    #[tokio::test]
    async fn fail_run_reports_outcome() {
        let service = MockPipelineService::new().fail_run("audit expectation violated");
        let outcome = service.run(request()).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn fail_transport_reports_error() {
        let service = MockPipelineService::new()
            .fail_transport(PipelineError::NetworkError("unreachable".into()));
        let result = service.run(request()).await;
        assert!(matches!(result, Err(PipelineError::NetworkError(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_observable_under_paused_time() {
        let service = MockPipelineService::new().with_delay(Duration::from_secs(600));
        let bounded = tokio::time::timeout(Duration::from_secs(500), service.run(request())).await;
        assert!(bounded.is_err(), "run should exceed the caller's deadline");
    }

    #[tokio::test]
    async fn runs_recorded() {
        let service = MockPipelineService::new();
        service.run(request()).await.unwrap();
        let runs = service.runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].branch, "jamie.sandbox_trips_1");
    }
}
