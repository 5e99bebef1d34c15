#![allow(clippy::unwrap_used, dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use persona::{
    api::{Client, Request, Response, Transport, TransportError},
    config::{ClientConfig, PollConfig},
};
use reqwest::StatusCode;
use serde_json::{json, Value};

type Handler = dyn Fn(&Request) -> Result<Response, TransportError> + Send + Sync;

/// In-memory transport answering from a handler and recording every
/// request it sees.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    seen: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new(
        handler: impl Fn(&Request) -> Result<Response, TransportError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<Request> {
        self.seen.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.method.as_str() == method && request.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fire(&self, request: Request) -> Result<Response, TransportError> {
        let answer = (self.handler)(&request);
        self.seen.lock().unwrap().push(request);
        answer
    }
}

pub fn client(transport: Arc<ScriptedTransport>, poll: PollConfig) -> Client {
    let config = ClientConfig::new("persona_sandbox_test")
        .with_tin_template_id("vtmpl_default")
        .with_poll(poll);
    Client::with_transport(transport, config)
}

pub fn record(kind: &str, id: &str, attributes: Value) -> Response {
    Response::with_json(
        StatusCode::OK,
        json!({"data": {"type": kind, "id": id, "attributes": attributes}}),
    )
}

pub fn rejected(status: StatusCode, title: &str) -> Response {
    Response::with_json(status, json!({"errors": [{"title": title, "details": "rejected"}]}))
}

pub fn not_found() -> Response {
    rejected(StatusCode::NOT_FOUND, "Record not found")
}
