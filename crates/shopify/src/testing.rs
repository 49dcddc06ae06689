//! Scripted in-memory transport for tests.
//!
//! Plays back a queue of canned results and records every executed document,
//! letting retry, resolution, and demux logic run without a network.

use std::sync::Mutex;

use serde_json::Value;

use crate::error::ShopifyError;
use crate::transport::Transport;

#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<Vec<Result<Value, ShopifyError>>>,
    executed: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next result; results play back in push order.
    pub fn push(&self, result: Result<Value, ShopifyError>) {
        self.responses.lock().unwrap().push(result);
    }

    pub fn push_ok(&self, data: Value) {
        self.push(Ok(data));
    }

    pub fn push_err(&self, error: ShopifyError) {
        self.push(Err(error));
    }

    /// Documents executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl Transport for ScriptedTransport {
    async fn execute(&self, document: &str) -> Result<Value, ShopifyError> {
        self.executed.lock().unwrap().push(document.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(ShopifyError::parse("no scripted response left"));
        }
        responses.remove(0)
    }
}
