#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use groove_client::{Error, Result, SearchBackend, SearchRequest};
use serde_json::{json, Value};

/// In-process backend that records request bodies and replays a canned reply.
pub struct FakeBackend {
    reply: Reply,
    requests: Mutex<Vec<Value>>,
}

enum Reply {
    Body(Value),
    Rejected(u16, String),
    Unavailable,
}

impl FakeBackend {
    pub fn returning(body: Value) -> Self {
        Self::with_reply(Reply::Body(body))
    }

    pub fn rejecting(status: u16, body: &str) -> Self {
        Self::with_reply(Reply::Rejected(status, body.to_string()))
    }

    pub fn unavailable() -> Self {
        Self::with_reply(Reply::Unavailable)
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn execute(&self, request: &SearchRequest) -> Result<Value> {
        self.requests.lock().unwrap().push(request.to_body());
        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Rejected(status, body) => Err(Error::QueryExecution {
                status: *status,
                body: body.clone(),
            }),
            Reply::Unavailable => Err(Error::BackendUnavailable("connection refused".into())),
        }
    }
}

pub fn empty_response() -> Value {
    json!({
        "took": 1,
        "hits": { "total": { "value": 0, "relation": "eq" }, "hits": [] },
        "aggregations": {
            "taxon_ids": { "buckets": [] },
            "genre_ids": { "buckets": [] },
            "formats": { "doc_count": 0, "matching": { "doc_count": 0, "values": { "buckets": [] } } },
            "price": { "count": 0, "min": null, "max": null, "avg": null, "sum": 0.0 }
        }
    })
}

pub fn items(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
