use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Where the product index lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the cluster, without a trailing path.
    pub url: String,
    pub index: String,
    /// Whole-request timeout for the HTTP client.
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            index: "products".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "backend url must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.index.trim().is_empty() || self.index.contains('/') {
            return Err(Error::InvalidConfig(format!(
                "invalid index name '{}'",
                self.index
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(Error::InvalidConfig(
                "timeout_seconds must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn search_url(&self) -> String {
        format!("{}/{}/_search", self.url.trim_end_matches('/'), self.index)
    }
}
