//! In-memory transport replaying canned answers, for unit tests

use crate::error::{Error, Result};
use crate::transport::{ApiResponse, Body, Transport, classify};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A canned answer
#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    body: String,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Option<Body>,
    pub params: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn body_value(&self) -> Value {
        self.body.clone().map(Value::Object).unwrap_or(Value::Null)
    }
}

#[derive(Debug)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    has_credential: bool,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            has_credential: true,
        })
    }

    pub fn without_credential() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            has_credential: false,
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn ensure_credential(&self) -> Result<()> {
        if self.has_credential {
            Ok(())
        } else {
            Err(Error::Config("API key is not set".to_string()))
        }
    }

    async fn post(
        &self,
        path: &str,
        body: Option<Body>,
        params: &[(String, String)],
    ) -> Result<ApiResponse> {
        self.ensure_credential()?;

        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            body,
            params: params.to_vec(),
        });

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::UnexpectedResponse(format!("no reply scripted for {path}")))?;
        classify(reply.status, reply.body)
    }
}

/// `count` search hits with distinct `_source.sha256` values
pub fn hits(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "_id": i.to_string(),
                "_source": { "sha256": format!("{:064x}", i), "malware": 1 }
            })
        })
        .collect()
}
