//! catalog::rest
//!
//! REST catalog client.
//!
//! # Design
//!
//! Implements the `Catalog` trait over the catalog's HTTP API using a
//! single `reqwest::Client`. Structured import/merge outcomes are
//! carried in the response body (`status` + optional `message`), so a
//! 200 response can still describe a failed operation; transport
//! failures map onto `CatalogError`.
//!
//! # Authentication
//!
//! A static API key is sent as a bearer token on every request. Key
//! rotation is handled outside the process (the key lives in config or
//! the environment and is read once at startup).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::traits::{Catalog, CatalogError, ImportOutcome, MergeOutcome, TableSpec};
use crate::core::types::BranchName;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "landfall";

/// REST catalog client.
pub struct RestCatalog {
    /// HTTP client for making requests
    client: Client,
    /// API base URL
    base_url: String,
    /// Static API key
    api_key: String,
}

// Custom Debug to avoid exposing the API key.
impl std::fmt::Debug for RestCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCatalog")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Serialize)]
struct CreateBranchBody<'a> {
    name: &'a str,
    parent: &'a str,
}

#[derive(Serialize)]
struct TableBody<'a> {
    source_uri: &'a str,
    replace: bool,
}

#[derive(Serialize)]
struct ImportBody<'a> {
    source_uri: &'a str,
}

#[derive(Serialize)]
struct MergeBody<'a> {
    source: &'a str,
    into: &'a str,
}

/// Response body for operations that report a structured outcome.
#[derive(Deserialize)]
struct OutcomeBody {
    status: OutcomeStatus,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum OutcomeStatus {
    Success,
    Error,
}

impl RestCatalog {
    /// Create a new REST catalog client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API base URL, without a trailing slash
    /// * `api_key` - Static API key sent as a bearer token
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    fn headers(&self) -> Result<HeaderMap, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        let auth = format!("Bearer {}", self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| CatalogError::AuthFailed("API key is not a valid header".into()))?,
        );
        Ok(headers)
    }

    /// Map an error response onto the `CatalogError` taxonomy.
    async fn error_for(response: Response, context: &str) -> CatalogError {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CatalogError::AuthFailed(message),
            StatusCode::NOT_FOUND => CatalogError::NotFound(context.to_string()),
            _ => CatalogError::ApiError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Send a request that reports a structured outcome in its body.
    async fn send_outcome<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        context: &str,
    ) -> Result<OutcomeBody, CatalogError> {
        let response = self
            .client
            .post(self.url(path))
            .headers(self.headers()?)
            .json(body)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, context).await);
        }
        response
            .json::<OutcomeBody>()
            .await
            .map_err(|e| CatalogError::NetworkError(format!("malformed response body: {e}")))
    }
}

#[async_trait]
impl Catalog for RestCatalog {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn branch_exists(&self, branch: &BranchName) -> Result<bool, CatalogError> {
        let response = self
            .client
            .get(self.url(&format!("branches/{}", branch)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(Self::error_for(response, &format!("branch '{}'", branch)).await),
        }
    }

    async fn create_branch(
        &self,
        branch: &BranchName,
        parent: &BranchName,
    ) -> Result<(), CatalogError> {
        let body = CreateBranchBody {
            name: branch.as_str(),
            parent: parent.as_str(),
        };
        let response = self
            .client
            .post(self.url("branches"))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, &format!("parent ref '{}'", parent)).await);
        }
        Ok(())
    }

    async fn delete_branch(&self, branch: &BranchName) -> Result<(), CatalogError> {
        let response = self
            .client
            .delete(self.url(&format!("branches/{}", branch)))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, &format!("branch '{}'", branch)).await);
        }
        Ok(())
    }

    async fn create_or_replace_table(
        &self,
        spec: &TableSpec,
        branch: &BranchName,
        source_uri: &str,
    ) -> Result<(), CatalogError> {
        let body = TableBody {
            source_uri,
            replace: true,
        };
        let response = self
            .client
            .put(self.url(&format!(
                "branches/{}/namespaces/{}/tables/{}",
                branch, spec.namespace, spec.table
            )))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_for(response, &format!("table '{}'", spec)).await);
        }
        Ok(())
    }

    async fn import_data(
        &self,
        spec: &TableSpec,
        branch: &BranchName,
        source_uri: &str,
    ) -> Result<ImportOutcome, CatalogError> {
        let body = ImportBody { source_uri };
        let outcome = self
            .send_outcome(
                &format!(
                    "branches/{}/namespaces/{}/tables/{}/import",
                    branch, spec.namespace, spec.table
                ),
                &body,
                &format!("table '{}'", spec),
            )
            .await?;

        Ok(match outcome.status {
            OutcomeStatus::Success => ImportOutcome::Success,
            OutcomeStatus::Error => ImportOutcome::Failed {
                message: outcome
                    .message
                    .unwrap_or_else(|| "import rejected without message".to_string()),
            },
        })
    }

    async fn merge_branch(
        &self,
        source: &BranchName,
        into: &BranchName,
    ) -> Result<MergeOutcome, CatalogError> {
        let body = MergeBody {
            source: source.as_str(),
            into: into.as_str(),
        };
        let outcome = self
            .send_outcome("merges", &body, &format!("branch '{}'", source))
            .await?;

        Ok(match outcome.status {
            OutcomeStatus::Success => MergeOutcome::Success,
            OutcomeStatus::Error => MergeOutcome::Rejected {
                message: outcome
                    .message
                    .unwrap_or_else(|| "merge rejected without message".to_string()),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let catalog = RestCatalog::new("https://catalog.example.com/", "key");
        assert_eq!(
            catalog.url("branches/main"),
            "https://catalog.example.com/v1/branches/main"
        );
    }

    #[test]
    fn debug_hides_api_key() {
        let catalog = RestCatalog::new("https://catalog.example.com", "super-secret");
        let debug = format!("{:?}", catalog);
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn outcome_body_parses() {
        let ok: OutcomeBody = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(ok.status == OutcomeStatus::Success);

        let err: OutcomeBody =
            serde_json::from_str(r#"{"status":"error","message":"schema mismatch"}"#).unwrap();
        assert!(err.status == OutcomeStatus::Error);
        assert_eq!(err.message.as_deref(), Some("schema mismatch"));
    }
}
