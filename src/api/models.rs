use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::transport::Response;
use crate::errors::ErrorInfo;

/// Anything the job runner can follow: it only needs the id.
pub trait Resource: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// A JSON:API resource object as the service returns it.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Record<A> {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub id: String,
    #[serde(default)]
    pub attributes: A,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Value>,
    /// Side-loaded records from the document's top-level `included`.
    #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Value>,
}

impl<A: Clone + Send + Sync + 'static> Resource for Record<A> {
    fn id(&self) -> &str {
        &self.id
    }
}

impl<A> Record<A> {
    /// Id of a related record, e.g. `related_id("inquiry")`.
    pub fn related_id(&self, relation: &str) -> Option<&str> {
        self.relationships
            .as_ref()?
            .get(relation)?
            .get("data")?
            .get("id")?
            .as_str()
    }
}

/// Paging and support metadata of one call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CallDetails {
    pub prev: Option<String>,
    pub next: Option<String>,
    pub request_id: Option<String>,
    /// Server-side processing time in seconds, from `x-runtime`.
    pub runtime: Option<f64>,
}

impl CallDetails {
    pub fn from_response(response: &Response) -> Self {
        let link = |name: &str| {
            response
                .payload()
                .and_then(|payload| payload.get("links"))
                .and_then(|links| links.get(name))
                .and_then(Value::as_str)
                .filter(|link| !link.is_empty())
                .map(str::to_owned)
        };

        Self {
            prev: link("prev"),
            next: link("next"),
            request_id: response.header_value("x-request-id").map(str::to_owned),
            runtime: response.header_value("x-runtime").and_then(parse_runtime),
        }
    }
}

fn parse_runtime(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | '$')).collect();
    cleaned.trim().parse().ok()
}

/// One page of a list call.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub details: CallDetails,
}

impl<T> Page<T> {
    /// Cursor for `page[after]`: the id of the last item, when the
    /// service says there is a next page.
    pub fn next_cursor(&self) -> Option<&str>
    where
        T: Resource,
    {
        self.details.next.as_ref()?;
        self.items.last().map(Resource::id)
    }
}

/// `{"data": {"type": ..., "attributes": ...}}`
pub fn envelope(kind: Option<&str>, attributes: Value) -> Value {
    let mut data = Map::new();
    if let Some(kind) = kind {
        data.insert("type".to_owned(), Value::String(kind.to_owned()));
    }
    data.insert("attributes".to_owned(), attributes);
    json!({ "data": Value::Object(data) })
}

/// # Errors
///
/// Returns `ErrorInfo::Malformed` when the payload has no `data` member or
/// it doesn't have the expected shape.
pub fn decode_data<T: DeserializeOwned>(response: &Response) -> Result<T, ErrorInfo> {
    let data = response
        .payload()
        .and_then(|payload| payload.get("data"))
        .ok_or_else(|| ErrorInfo::Malformed {
            message: "response has no `data` member".to_owned(),
        })?;

    T::deserialize(data).map_err(|err| {
        log::error!("Failed to decode response data: {err}");
        log::debug!("Response data: {data}");
        ErrorInfo::Malformed {
            message: format!("failed to decode response data: {err}"),
        }
    })
}

/// Like [`decode_data`] for a single record, keeping the side-loaded
/// `included` records next to it.
///
/// # Errors
///
/// Same as [`decode_data`].
pub fn decode_record<A: DeserializeOwned + Default>(response: &Response) -> Result<Record<A>, ErrorInfo> {
    let mut record: Record<A> = decode_data(response)?;
    record.included = response
        .payload()
        .and_then(|payload| payload.get("included"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Ok(record)
}
