use async_trait::async_trait;
use serde::Serialize;
use serde_json::to_value;

use super::verification::{Verification, Verifications};
use crate::{
    api::{decode_data, envelope, Client, Request},
    errors::ErrorInfo,
    job::{Accessor, JobRunner, RunResult},
};

const KIND: &str = "verification/database-tin";

/// A business name and its tax id (EIN).
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TinVerificationInput {
    pub name_business: String,
    pub tin: String,
    /// Falls back to the client's configured TIN template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// Database TIN verifications. Processing is finished once the
/// verification carries a completion timestamp.
#[derive(Clone)]
pub struct TinVerifications {
    client: Client,
}

impl TinVerifications {
    pub(crate) const fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn run(
        &self,
        input: &TinVerificationInput,
        synchronous: bool,
    ) -> RunResult<Verification> {
        JobRunner::new(self.clone())
            .with_poll(self.client.poll_config())
            .run(input, synchronous)
            .await
    }

    fn with_template(&self, input: &TinVerificationInput) -> TinVerificationInput {
        let mut input = input.clone();
        if input.verification_template_id.is_none() {
            input
                .verification_template_id
                .clone_from(&self.client.config().tin_template_id);
        }
        input
    }
}

#[async_trait]
impl Accessor for TinVerifications {
    type Input = TinVerificationInput;
    type Resource = Verification;

    fn kind(&self) -> &'static str {
        "TIN verification"
    }

    async fn create(&self, input: &Self::Input) -> Result<Verification, ErrorInfo> {
        let attributes =
            to_value(self.with_template(input)).map_err(|err| ErrorInfo::local(err.to_string()))?;
        let request =
            Request::post("verification/database-tins").json(envelope(Some(KIND), attributes));
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    async fn submit(&self, id: &str) -> Option<Result<Verification, ErrorInfo>> {
        let request = Request::post(format!("verification/database-tins/{id}/submit"));
        let submitted = match self.client.call(request).await {
            Ok(response) => decode_data(&response),
            Err(error) => Err(error),
        };
        Some(submitted)
    }

    // TIN verifications are read back through the generic endpoint.
    async fn fetch(&self, id: &str) -> Result<Verification, ErrorInfo> {
        Verifications::new(self.client.clone()).fetch(id).await
    }

    fn is_terminal(&self, verification: &Verification) -> bool {
        verification.is_completed()
    }
}
