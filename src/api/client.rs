use std::sync::Arc;

use super::{
    http::HttpTransport,
    transport::{Request, Response, Transport},
};
use crate::{
    config::{ClientConfig, PollConfig},
    errors::{ClientError, ErrorInfo},
    resources::{
        account::Accounts, inquiry::Inquiries, report::Reports, verification::Verifications,
    },
};

/// Entry point of the library. Cloning is cheap; every clone shares the
/// same transport.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: Arc<ClientConfig>,
}

impl Client {
    /// # Errors
    ///
    /// Fails if the configured host is not a usable base URL or the API
    /// key is missing.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Uses a caller supplied transport, e.g. a recording one in tests.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn poll_config(&self) -> PollConfig {
        self.config.poll
    }

    pub fn accounts(&self) -> Accounts {
        Accounts::new(self.clone())
    }

    pub fn inquiries(&self) -> Inquiries {
        Inquiries::new(self.clone())
    }

    pub fn verifications(&self) -> Verifications {
        Verifications::new(self.clone())
    }

    pub fn reports(&self) -> Reports {
        Reports::new(self.clone())
    }

    /// Fires `request` and applies the failure convention to the answer.
    ///
    /// # Errors
    ///
    /// `ErrorInfo::Transport` when nothing came back, `ErrorInfo::Remote`
    /// when the service reported a failure.
    pub async fn call(&self, request: Request) -> Result<Response, ErrorInfo> {
        let method = request.method.clone();
        let path = request.path.clone();

        let response = self.transport.fire(request).await.map_err(|err| {
            log::warn!("{method} {path} failed before a response arrived: {err}");
            ErrorInfo::from(err)
        })?;

        let details = response.details();
        log::debug!(
            "{method} {path} returned {} (request id: {}, runtime: {:?})",
            response.status,
            details.request_id.as_deref().unwrap_or("-"),
            details.runtime,
        );

        response.check()
    }
}
