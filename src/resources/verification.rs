use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Display;

use super::{database::DatabaseVerifications, tin::TinVerifications};
use crate::{
    api::{decode_data, Client, Payload, Record, Request},
    errors::ErrorInfo,
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Initiated,
    Submitted,
    Passed,
    Failed,
    RequiresRetry,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initiated => write!(f, "Initiated"),
            Self::Submitted => write!(f, "Submitted"),
            Self::Passed => write!(f, "Passed"),
            Self::Failed => write!(f, "Failed"),
            Self::RequiresRetry => write!(f, "RequiresRetry"),
            Self::Canceled => write!(f, "Canceled"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct VerificationCheck {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub metadata: Value,
}

/// Attributes shared by every verification kind. Kind specific fields
/// (names, addresses, TINs) are kept in `extra`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationAttributes {
    pub status: Option<VerificationStatus>,
    pub created_at: Option<String>,
    pub submitted_at: Option<String>,
    pub completed_at: Option<String>,
    pub country_code: Option<String>,
    #[serde(default)]
    pub checks: Vec<VerificationCheck>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type Verification = Record<VerificationAttributes>;

impl Record<VerificationAttributes> {
    pub const fn status(&self) -> Option<&VerificationStatus> {
        self.attributes.status.as_ref()
    }

    pub const fn is_completed(&self) -> bool {
        self.attributes.completed_at.is_some()
    }

    pub fn has_passed(&self) -> bool {
        matches!(self.attributes.status, Some(VerificationStatus::Passed))
    }

    /// Checks that did not pass, e.g. for showing why a verification failed.
    pub fn failed_checks(&self) -> impl Iterator<Item = &VerificationCheck> {
        self.attributes
            .checks
            .iter()
            .filter(|check| check.status == "failed")
    }
}

/// Kind-agnostic verification endpoints.
#[derive(Clone)]
pub struct Verifications {
    client: Client,
}

impl Verifications {
    pub(crate) const fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn database(&self) -> DatabaseVerifications {
        DatabaseVerifications::new(self.client.clone())
    }

    pub fn tin(&self) -> TinVerifications {
        TinVerifications::new(self.client.clone())
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// lookup.
    pub async fn fetch(&self, verification_id: &str) -> Result<Verification, ErrorInfo> {
        let response = self
            .client
            .call(Request::get(format!("verifications/{verification_id}")))
            .await?;
        decode_data(&response)
    }

    /// The verification rendered as a PDF.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network error, if the service rejects the
    /// request, or if it answers with JSON instead of a document.
    pub async fn print(&self, verification_id: &str) -> Result<Vec<u8>, ErrorInfo> {
        let response = self
            .client
            .call(Request::get(format!("verifications/{verification_id}/print")))
            .await?;

        match response.body {
            Payload::Raw(bytes) => Ok(bytes),
            Payload::Empty => Ok(Vec::new()),
            Payload::Json(_) => Err(ErrorInfo::Malformed {
                message: format!("expected a PDF for verification {verification_id}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_deserializes_unknown_values() {
        let status: VerificationStatus = serde_json::from_value(json!("confirmed")).unwrap();
        assert_eq!(status, VerificationStatus::Unknown);
        let status: VerificationStatus = serde_json::from_value(json!("requires_retry")).unwrap();
        assert_eq!(status, VerificationStatus::RequiresRetry);
    }

    #[test]
    fn test_attributes_keep_kind_specific_fields() {
        let verification: Verification = serde_json::from_value(json!({
            "type": "verification/database-tin",
            "id": "ver_1",
            "attributes": {
                "status": "passed",
                "completedAt": "2023-01-01T00:00:00.000Z",
                "tin": "91-1144442",
                "checks": [
                    {"name": "tin_match", "status": "passed", "reasons": []},
                    {"name": "name_match", "status": "failed", "reasons": ["mismatch"]}
                ]
            }
        }))
        .unwrap();

        assert!(verification.has_passed());
        assert!(verification.is_completed());
        assert_eq!(verification.attributes.extra["tin"], json!("91-1144442"));
        let failed: Vec<&str> = verification
            .failed_checks()
            .map(|check| check.name.as_str())
            .collect();
        assert_eq!(failed, vec!["name_match"]);
    }
}
