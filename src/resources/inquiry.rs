use serde::{Deserialize, Serialize};
use serde_json::{json, to_value, Map, Value};

use super::{idempotency_headers, ListOptions, RequestOptions};
use crate::{
    api::{decode_data, envelope, Client, Page, Payload, Record, Request},
    errors::ErrorInfo,
    validation::exactly_one_of,
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    Created,
    Pending,
    Completed,
    Failed,
    Expired,
    NeedsReview,
    Approved,
    Declined,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryAttributes {
    pub status: Option<InquiryStatus>,
    pub reference_id: Option<String>,
    pub note: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Option<String>,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
    pub failed_at: Option<String>,
    pub decisioned_at: Option<String>,
    pub expired_at: Option<String>,
    pub redacted_at: Option<String>,
    pub name_first: Option<String>,
    pub name_last: Option<String>,
    pub birthdate: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type Inquiry = Record<InquiryAttributes>;

/// Attributes of a new inquiry. Exactly one of `template_id` and
/// `inquiry_template_id`, and exactly one of `account_id` and
/// `reference_id`, must be given.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inquiry_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl CreateInquiry {
    /// # Errors
    ///
    /// Returns a local `ErrorInfo` naming the offending pair.
    pub fn validate(&self) -> Result<(), ErrorInfo> {
        exactly_one_of(
            ("templateId", self.template_id.as_deref()),
            ("inquiryTemplateId", self.inquiry_template_id.as_deref()),
        )?;
        exactly_one_of(
            ("accountId", self.account_id.as_deref()),
            ("referenceId", self.reference_id.as_deref()),
        )
    }
}

#[derive(Clone)]
pub struct Inquiries {
    client: Client,
}

impl Inquiries {
    pub(crate) const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Validates the alternative pairs before anything is sent.
    ///
    /// # Errors
    ///
    /// Will return `Err` if validation fails, on network error, or if the
    /// service rejects the inquiry.
    pub async fn create(
        &self,
        inquiry: &CreateInquiry,
        options: &RequestOptions,
    ) -> Result<Inquiry, ErrorInfo> {
        inquiry.validate()?;
        let attributes = to_value(inquiry).map_err(|err| ErrorInfo::local(err.to_string()))?;
        let request = Request::post("inquiries")
            .headers(idempotency_headers(options.idempotency_key.as_deref()))
            .json(envelope(None, attributes));
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// lookup.
    pub async fn fetch(&self, inquiry_id: &str) -> Result<Inquiry, ErrorInfo> {
        let response = self
            .client
            .call(Request::get(format!("inquiries/{inquiry_id}")))
            .await?;
        decode_data(&response)
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// listing.
    pub async fn list(&self, options: &ListOptions) -> Result<Page<Inquiry>, ErrorInfo> {
        let response = self
            .client
            .call(options.apply(Request::get("inquiries")))
            .await?;
        Ok(Page {
            items: decode_data(&response)?,
            details: response.details(),
        })
    }

    /// Changes the given attributes; the rest are left as they are.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// update.
    pub async fn update(
        &self,
        inquiry_id: &str,
        attributes: &Map<String, Value>,
    ) -> Result<Inquiry, ErrorInfo> {
        let request = Request::patch(format!("inquiries/{inquiry_id}"))
            .json(envelope(None, Value::Object(attributes.clone())));
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    /// Reopens an expired or pending inquiry so the individual can go on.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// request.
    pub async fn resume(
        &self,
        inquiry_id: &str,
        options: &RequestOptions,
    ) -> Result<Inquiry, ErrorInfo> {
        let request = Request::post(format!("inquiries/{inquiry_id}/resume"))
            .headers(idempotency_headers(options.idempotency_key.as_deref()));
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// decision.
    pub async fn approve(
        &self,
        inquiry_id: &str,
        comment: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Inquiry, ErrorInfo> {
        self.decide(inquiry_id, "approve", comment, options).await
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// decision.
    pub async fn decline(
        &self,
        inquiry_id: &str,
        comment: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Inquiry, ErrorInfo> {
        self.decide(inquiry_id, "decline", comment, options).await
    }

    async fn decide(
        &self,
        inquiry_id: &str,
        decision: &str,
        comment: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Inquiry, ErrorInfo> {
        let request = Request::post(format!("inquiries/{inquiry_id}/{decision}"))
            .headers(idempotency_headers(options.idempotency_key.as_deref()))
            .json(decision_body(comment));
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    /// Deletes the inquiry and returns the record as it was.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// deletion.
    pub async fn delete(&self, inquiry_id: &str) -> Result<Inquiry, ErrorInfo> {
        let response = self
            .client
            .call(Request::delete(format!("inquiries/{inquiry_id}")))
            .await?;
        decode_data(&response)
    }

    /// The inquiry rendered as a PDF.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network error, if the service rejects the
    /// request, or if it answers with JSON instead of a document.
    pub async fn print(&self, inquiry_id: &str) -> Result<Vec<u8>, ErrorInfo> {
        let response = self
            .client
            .call(Request::get(format!("inquiries/{inquiry_id}/print")))
            .await?;

        match response.body {
            Payload::Raw(bytes) => Ok(bytes),
            Payload::Empty => Ok(Vec::new()),
            Payload::Json(_) => Err(ErrorInfo::Malformed {
                message: format!("expected a PDF for inquiry {inquiry_id}"),
            }),
        }
    }
}

fn decision_body(comment: Option<&str>) -> Value {
    match comment {
        Some(comment) => json!({"meta": {"comment": comment}}),
        None => json!({"meta": {}}),
    }
}
