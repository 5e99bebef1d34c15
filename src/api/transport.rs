use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::models::CallDetails;
use crate::errors::{Cause, ErrorInfo};

/// A query parameter value. Empty values are dropped before the request
/// leaves the client.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

impl QueryValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
            Self::Int(_) | Self::Bool(_) => false,
        }
    }

    /// Values as they appear on the wire; lists repeat the key.
    pub fn render(&self) -> Vec<String> {
        match self {
            Self::Str(value) => vec![value.clone()],
            Self::Int(value) => vec![value.to_string()],
            Self::Bool(value) => vec![value.to_string()],
            Self::List(values) => values.clone(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Body {
    Json(Value),
}

/// Description of one call to the API, relative to the configured host.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, QueryValue)>,
    pub body: Option<Body>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.query.push((name.into(), value));
        }
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Json(Value),
    Raw(Vec<u8>),
    Empty,
}

/// What came back from the service. Header names are lowercase.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub body: Payload,
    pub headers: BTreeMap<String, String>,
}

impl Response {
    pub fn with_json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: Payload::Json(body),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_bytes(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            body: Payload::Raw(body),
            headers: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub const fn payload(&self) -> Option<&Value> {
        match &self.body {
            Payload::Json(value) => Some(value),
            Payload::Raw(_) | Payload::Empty => None,
        }
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Entries of the payload's `errors` array, if any.
    pub fn errors(&self) -> Vec<Cause> {
        self.payload()
            .and_then(|payload| payload.get("errors"))
            .and_then(Value::as_array)
            .map(|errors| errors.iter().map(Cause::from_value).collect())
            .unwrap_or_default()
    }

    pub fn details(&self) -> CallDetails {
        CallDetails::from_response(self)
    }

    /// Applies the service's failure convention: a status of 400 or more,
    /// or a non-empty `errors` array. The array supplies the causes when
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `ErrorInfo::Remote` when the response signals failure.
    pub fn check(self) -> Result<Self, ErrorInfo> {
        let causes = self.errors();
        let failed_status = self.status.as_u16() >= 400;
        if causes.is_empty() && !failed_status {
            return Ok(self);
        }

        let causes = if causes.is_empty() {
            vec![self.fallback_cause()]
        } else {
            causes
        };
        Err(ErrorInfo::Remote {
            status: failed_status.then_some(self.status),
            causes,
        })
    }

    fn fallback_cause(&self) -> Cause {
        let title = self
            .status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_owned();
        let detail = match &self.body {
            Payload::Json(value) => value.to_string(),
            Payload::Raw(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Payload::Empty => String::new(),
        };
        Cause::new(title, detail)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("[E201] Base URL cannot carry a request path: {0}")]
    CannotBeBase(Url),

    #[error("[E202] Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("[E203] Connection failed: {0}")]
    Connection(String),

    #[error(transparent)]
    Reqwest(reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Reqwest(err)
        }
    }
}

/// Sends one authenticated request. Implementations hold no per-call
/// state and are shared by every concurrent run.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fire(&self, request: Request) -> Result<Response, TransportError>;
}
