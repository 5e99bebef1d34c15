// Re-export the API module components
pub use self::{
    client::Client,
    http::HttpTransport,
    models::{decode_data, decode_record, envelope, CallDetails, Page, Record, Resource},
    transport::{Body, Payload, QueryValue, Request, Response, Transport, TransportError},
};

// Module declarations
mod client;
mod http;
mod models;
mod transport;
