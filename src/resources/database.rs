use async_trait::async_trait;
use serde::Serialize;
use serde_json::to_value;

use super::{
    idempotency_headers,
    verification::{Verification, VerificationStatus},
};
use crate::{
    api::{decode_data, envelope, Client, Request},
    errors::ErrorInfo,
    job::{Accessor, JobRunner, RunResult},
};

const KIND: &str = "verification/database";

/// Identity data checked against authoritative databases. Attached to an
/// existing inquiry.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseVerificationInput {
    pub inquiry_id: String,
    pub name_first: String,
    pub name_last: String,
    pub address_street_1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_street_2: Option<String>,
    pub address_city: String,
    pub address_subdivision: String,
    pub address_postal_code: String,
    pub identification_number: String,
    pub birthdate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Sent as the `Idempotency-Key` header, not as an attribute.
    #[serde(skip)]
    pub idempotency_key: Option<String>,
}

/// Database identity verifications. Processing is finished once the
/// status leaves `submitted`.
#[derive(Clone)]
pub struct DatabaseVerifications {
    client: Client,
}

impl DatabaseVerifications {
    pub(crate) const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create, submit and, when `synchronous`, wait for the result.
    pub async fn run(
        &self,
        input: &DatabaseVerificationInput,
        synchronous: bool,
    ) -> RunResult<Verification> {
        JobRunner::new(self.clone())
            .with_poll(self.client.poll_config())
            .run(input, synchronous)
            .await
    }
}

#[async_trait]
impl Accessor for DatabaseVerifications {
    type Input = DatabaseVerificationInput;
    type Resource = Verification;

    fn kind(&self) -> &'static str {
        "database verification"
    }

    async fn create(&self, input: &Self::Input) -> Result<Verification, ErrorInfo> {
        let attributes = to_value(input).map_err(|err| ErrorInfo::local(err.to_string()))?;
        let request = Request::post("verification/databases")
            .headers(idempotency_headers(input.idempotency_key.as_deref()))
            .json(envelope(Some(KIND), attributes));
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    async fn submit(&self, id: &str) -> Option<Result<Verification, ErrorInfo>> {
        let request = Request::post(format!("verification/databases/{id}/submit"));
        let submitted = match self.client.call(request).await {
            Ok(response) => decode_data(&response),
            Err(error) => Err(error),
        };
        Some(submitted)
    }

    async fn fetch(&self, id: &str) -> Result<Verification, ErrorInfo> {
        let response = self
            .client
            .call(Request::get(format!("verification/databases/{id}")))
            .await?;
        decode_data(&response)
    }

    fn is_terminal(&self, verification: &Verification) -> bool {
        verification.status() != Some(&VerificationStatus::Submitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_serializes_camel_case_without_empty_optionals() {
        let input = DatabaseVerificationInput {
            inquiry_id: "inq_1".to_owned(),
            name_first: "Tralisha".to_owned(),
            address_street_1: "327 Briarbend Rd".to_owned(),
            idempotency_key: Some("key-1".to_owned()),
            ..DatabaseVerificationInput::default()
        };
        let value = to_value(&input).unwrap();
        assert_eq!(value["inquiryId"], json!("inq_1"));
        assert_eq!(value["addressStreet1"], json!("327 Briarbend Rd"));
        assert!(value.get("addressStreet2").is_none());
        assert!(value.get("idempotencyKey").is_none());
    }
}
