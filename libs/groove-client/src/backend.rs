//! Backend abstraction.

use async_trait::async_trait;
use groove_query::CompiledQuery;
use serde_json::{json, Value as JsonValue};

use crate::error::Result;

/// One page request: the compiled body plus its window.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: CompiledQuery,
    pub from: u64,
    pub size: u32,
}

impl SearchRequest {
    /// Full `_search` request body.
    pub fn to_body(&self) -> JsonValue {
        let mut body = self.query.to_json();
        body["from"] = json!(self.from);
        body["size"] = json!(self.size);
        body
    }
}

/// Executes one search round trip and returns the raw response body.
///
/// Implementations perform no retries; timeouts belong to the underlying
/// client.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn execute(&self, request: &SearchRequest) -> Result<JsonValue>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use groove_query::{QueryCompiler, SearchCriteria};

    #[test]
    fn body_carries_window() {
        let query = QueryCompiler::default().compile(&SearchCriteria::default());
        let request = SearchRequest {
            query,
            from: 50,
            size: 25,
        };
        let body = request.to_body();
        assert_eq!(body["from"], 50);
        assert_eq!(body["size"], 25);
        assert_eq!(body["min_score"], 0.1);
    }
}
