//! Elasticsearch HTTP backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;

use crate::backend::{SearchBackend, SearchRequest};
use crate::config::BackendConfig;
use crate::error::{Error, Result};

/// POSTs request bodies to `{url}/{index}/_search`.
pub struct ElasticsearchBackend {
    client: Client,
    search_url: String,
}

impl ElasticsearchBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use a caller-configured client (proxies, TLS roots, auth headers).
    pub fn with_client(client: Client, config: &BackendConfig) -> Self {
        Self {
            client,
            search_url: config.search_url(),
        }
    }

    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Throttling and server faults mean the backend is unavailable, a
    /// missing index means the backend is misconfigured. Any other rejection
    /// is a compiler defect.
    fn status_error(&self, status: StatusCode, body: String) -> Error {
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Error::BackendUnavailable(format!(
                "search failed with status {}: {}",
                status, body
            ));
        }
        if status == StatusCode::NOT_FOUND {
            return Error::InvalidConfig(format!(
                "no search endpoint at {}: {}",
                self.search_url, body
            ));
        }

        tracing::error!(
            status = status.as_u16(),
            body = %body,
            "Search backend rejected compiled query"
        );
        Error::QueryExecution {
            status: status.as_u16(),
            body,
        }
    }
}

#[async_trait]
impl SearchBackend for ElasticsearchBackend {
    async fn execute(&self, request: &SearchRequest) -> Result<JsonValue> {
        let response = self
            .client
            .post(&self.search_url)
            .json(&request.to_body())
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::from_transport)?;

        if !status.is_success() {
            return Err(self.status_error(status, body));
        }

        serde_json::from_str(&body).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}
