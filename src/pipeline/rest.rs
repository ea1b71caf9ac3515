//! pipeline::rest
//!
//! REST pipeline service client.
//!
//! # Design
//!
//! Submits the run synchronously: `POST /v1/runs` blocks until the run
//! reaches a terminal state and answers with its outcome. The caller
//! bounds the wait (see [`crate::run::transform`]); this client only
//! sets a generous transport-level ceiling so a dead connection cannot
//! hang forever underneath the caller's deadline.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{PipelineError, PipelineService, RunOutcome, RunRequest};
use crate::core::types::JobId;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "landfall";

/// Transport-level ceiling for a run request.
const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(3600);

/// REST pipeline service client.
pub struct RestPipelineService {
    /// HTTP client for making requests
    client: Client,
    /// API base URL
    base_url: String,
    /// Static API key
    api_key: String,
}

// Custom Debug to avoid exposing the API key.
impl std::fmt::Debug for RestPipelineService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestPipelineService")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct RunBody<'a> {
    project_dir: String,
    branch: &'a str,
    namespace: &'a str,
    parameters: &'a std::collections::BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RunResponse {
    #[serde(default)]
    job_id: Option<String>,
    status: RunStatus,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum RunStatus {
    Success,
    Error,
}

impl RestPipelineService {
    /// Create a new REST pipeline service client.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, PipelineError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        let auth = format!("Bearer {}", self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| PipelineError::AuthFailed("API key is not a valid header".into()))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl PipelineService for RestPipelineService {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn run(&self, request: RunRequest) -> Result<RunOutcome, PipelineError> {
        let body = RunBody {
            project_dir: request.project_dir.display().to_string(),
            branch: request.branch.as_str(),
            namespace: request.namespace.as_str(),
            parameters: &request.parameters,
        };

        let response = self
            .client
            .post(format!("{}/v1/runs", self.base_url))
            .headers(self.headers()?)
            .timeout(TRANSPORT_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    PipelineError::AuthFailed(message)
                }
                _ => PipelineError::ApiError {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let run: RunResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::NetworkError(format!("malformed response body: {e}")))?;

        Ok(match run.status {
            RunStatus::Success => RunOutcome::Success {
                job_id: JobId::new(run.job_id.unwrap_or_else(|| "unknown".to_string())),
            },
            RunStatus::Error => RunOutcome::Failed {
                job_id: run.job_id.map(JobId::new),
                message: run
                    .message
                    .unwrap_or_else(|| "run failed without message".to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_response_parses() {
        let ok: RunResponse =
            serde_json::from_str(r#"{"job_id":"job-7","status":"success"}"#).unwrap();
        assert!(ok.status == RunStatus::Success);
        assert_eq!(ok.job_id.as_deref(), Some("job-7"));

        let err: RunResponse =
            serde_json::from_str(r#"{"status":"error","message":"model failed"}"#).unwrap();
        assert!(err.status == RunStatus::Error);
        assert!(err.job_id.is_none());
    }

    #[test]
    fn debug_hides_api_key() {
        let service = RestPipelineService::new("https://runner.example.com", "super-secret");
        let debug = format!("{:?}", service);
        assert!(!debug.contains("super-secret"));
    }
}
