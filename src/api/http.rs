use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use url::Url;

use super::transport::{Body, Payload, QueryValue, Request, Response, Transport, TransportError};
use crate::{config::ClientConfig, errors::ClientError};

const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// [`Transport`] over HTTPS using `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    base: Url,
    client: Client,
    api_key: String,
    api_version: String,
    key_inflection: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Fails if the configured host is not a valid URL or cannot be a
    /// base. We rely on that invariant in [`HttpTransport::request_url`].
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        let base = Url::parse(&config.host)?;
        // Test here so that we are sure path_segments_mut succeeds
        if base.cannot_be_a_base() {
            return Err(ClientError::CannotBeBase(base));
        }

        Ok(Self {
            base,
            client: Client::builder().build()?,
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
            key_inflection: config.key_inflection.clone(),
        })
    }

    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// # Errors
    ///
    /// Will return `Err` if the URL cannot be a base.
    pub fn request_url(
        &self,
        path: &str,
        query: &[(String, QueryValue)],
    ) -> Result<Url, TransportError> {
        let mut url = self.base.clone();
        let url_clone = url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::CannotBeBase(url_clone))?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));

        let pairs: Vec<(&str, String)> = query
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .flat_map(|(name, value)| {
                value
                    .render()
                    .into_iter()
                    .map(move |rendered| (name.as_str(), rendered))
            })
            .collect();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    /// Headers sent with every request, before per-call headers.
    pub fn standard_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("accept", "application/json".to_owned()),
            ("authorization", format!("Bearer {}", self.api_key)),
            ("persona-version", self.api_version.clone()),
            ("key-inflection", self.key_inflection.clone()),
            ("x-client-version", CLIENT_VERSION.to_owned()),
        ]
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fire(&self, request: Request) -> Result<Response, TransportError> {
        let url = self.request_url(&request.path, &request.query)?;
        log::debug!("{} {url}", request.method);

        let mut builder = self.client.request(request.method, url);
        for (name, value) in self.standard_headers() {
            builder = builder.header(name, value);
        }
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        // sets the JSON content type too
        if let Some(Body::Json(body)) = request.body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let is_json = headers
            .get(CONTENT_TYPE.as_str())
            .is_some_and(|content_type| content_type.contains("json"));

        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Payload::Empty
        } else if is_json {
            match serde_json::from_slice(&bytes) {
                Ok(value) => Payload::Json(value),
                Err(err) => {
                    log::error!("Failed to parse JSON response: {err}");
                    Payload::Raw(bytes.to_vec())
                }
            }
        } else {
            Payload::Raw(bytes.to_vec())
        };

        Ok(Response {
            status,
            body,
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(host: &str) -> HttpTransport {
        HttpTransport::new(&ClientConfig::new("persona_sandbox_key").with_host(host)).unwrap()
    }

    #[test]
    fn test_request_url_joins_path_segments() {
        let transport = transport("https://withpersona.com/api/v1");
        let url = transport
            .request_url("verification/database-tins/ver_1/submit", &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://withpersona.com/api/v1/verification/database-tins/ver_1/submit"
        );
    }

    #[test]
    fn test_request_url_tolerates_trailing_slash() {
        let transport = transport("https://withpersona.com/api/v1/");
        let url = transport.request_url("reports/rep_1", &[]).unwrap();
        assert_eq!(url.as_str(), "https://withpersona.com/api/v1/reports/rep_1");
    }

    #[test]
    fn test_request_url_encodes_query() {
        let transport = transport("https://withpersona.com/api/v1");
        let query = vec![
            ("page[size]".to_owned(), QueryValue::Int(5)),
            ("filter[reference-id]".to_owned(), QueryValue::from("")),
            (
                "fields".to_owned(),
                QueryValue::List(vec!["status".to_owned(), "tags".to_owned()]),
            ),
        ];
        let url = transport.request_url("inquiries", &query).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("page[size]".to_owned(), "5".to_owned()),
                ("fields".to_owned(), "status".to_owned()),
                ("fields".to_owned(), "tags".to_owned()),
            ]
        );
    }

    #[test]
    fn test_cannot_be_base_host_is_rejected() {
        let config = ClientConfig::new("key").with_host("mailto:ops@example.com");
        let result = HttpTransport::new(&config);
        assert!(matches!(result, Err(ClientError::CannotBeBase(_))));
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let result = HttpTransport::new(&ClientConfig::new(""));
        assert!(matches!(result, Err(ClientError::MissingApiKey)));
    }

    #[test]
    fn test_standard_headers_carry_auth_and_version() {
        let transport = transport("https://withpersona.com/api/v1");
        let headers = transport.standard_headers();
        assert!(headers.contains(&("authorization", "Bearer persona_sandbox_key".to_owned())));
        assert!(headers.contains(&("persona-version", "2021-07-05".to_owned())));
        assert!(headers.contains(&("key-inflection", "camel".to_owned())));
    }

    #[tokio::test]
    async fn test_refused_connection_maps_to_connection_error() {
        // a port that was just free, so nothing accepts on it
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let transport = transport(&format!("http://127.0.0.1:{port}/api/v1"));

        let result = transport.fire(Request::get("inquiries/inq_1")).await;

        assert!(matches!(result, Err(TransportError::Connection(_))));
    }
}
