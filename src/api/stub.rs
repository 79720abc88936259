//! Canned-response transport for unit tests

use super::ApiTransport;
use crate::error::{FilterError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub(crate) struct StubTransport {
    responses: HashMap<String, serde_json::Value>,
    failures: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, url: impl Into<String>, body: serde_json::Value) -> Self {
        self.responses.insert(url.into(), body);
        self
    }

    pub(crate) fn fail(mut self, url: impl Into<String>, status: u16) -> Self {
        self.failures.insert(url.into(), status);
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApiTransport for StubTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(&status) = self.failures.get(url) {
            return Err(FilterError::RemoteRequestFailed { url: url.to_string(), status });
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| FilterError::TransportFault(format!("no stubbed response for {}", url)))
    }
}
