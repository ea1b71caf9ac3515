//! storage::http
//!
//! HTTP object store client for S3-compatible endpoints.
//!
//! # Design
//!
//! Uploads use a path-style `PUT {endpoint}/{bucket}/{key}` against an
//! S3-compatible gateway that terminates authentication (the same
//! static bearer key as the catalog). The returned URI uses the `s3://`
//! scheme regardless of the gateway host, because that is the form the
//! catalog's import planner expects.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};

use super::traits::{ObjectStore, StorageError};

/// User-Agent header value for upload requests.
const USER_AGENT_VALUE: &str = "landfall";

/// HTTP object store client.
pub struct HttpObjectStore {
    /// HTTP client for making requests
    client: Client,
    /// Gateway endpoint URL
    endpoint: String,
    /// Static API key
    api_key: String,
}

// Custom Debug to avoid exposing the API key.
impl std::fmt::Debug for HttpObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpObjectStore")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl HttpObjectStore {
    /// Create a new HTTP object store client.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, StorageError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-ndjson"),
        );
        let auth = format!("Bearer {}", self.api_key);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|_| StorageError::AuthFailed("API key is not a valid header".into()))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn put(&self, bytes: &[u8], bucket: &str, key: &str) -> Result<String, StorageError> {
        let url = format!("{}/{}/{}", self.endpoint, bucket, key);
        let response = self
            .client
            .put(&url)
            .headers(self.headers()?)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    StorageError::AuthFailed(message)
                }
                _ => StorageError::ApiError {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        Ok(format!("s3://{}/{}", bucket, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_api_key() {
        let store = HttpObjectStore::new("https://s3.example.com", "super-secret");
        let debug = format!("{:?}", store);
        assert!(!debug.contains("super-secret"));
    }
}
