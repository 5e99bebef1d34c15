use serde::{Deserialize, Serialize};
use serde_json::{to_value, Map, Value};

use super::{idempotency_headers, ListOptions, RequestOptions};
use crate::{
    api::{decode_data, envelope, Client, Page, Record, Request},
    errors::ErrorInfo,
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    pub reference_id: Option<String>,
    pub name_first: Option<String>,
    pub name_middle: Option<String>,
    pub name_last: Option<String>,
    pub birthdate: Option<String>,
    pub address_street_1: Option<String>,
    pub address_street_2: Option<String>,
    pub address_city: Option<String>,
    pub address_subdivision: Option<String>,
    pub address_postal_code: Option<String>,
    pub country_code: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type Account = Record<AccountAttributes>;

/// Attributes sent when creating or updating an account. Unset fields are
/// left out of the request.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_middle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_last: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthplace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_street_1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_street_2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_subdivision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_security_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

impl AccountInput {
    fn body(&self) -> Result<Value, ErrorInfo> {
        let attributes = to_value(self).map_err(|err| ErrorInfo::local(err.to_string()))?;
        Ok(envelope(None, attributes))
    }
}

/// The people inquiries and verifications are attached to.
#[derive(Clone)]
pub struct Accounts {
    client: Client,
}

impl Accounts {
    pub(crate) const fn new(client: Client) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// listing.
    pub async fn list(&self, options: &ListOptions) -> Result<Page<Account>, ErrorInfo> {
        let response = self
            .client
            .call(options.apply(Request::get("accounts")))
            .await?;
        Ok(Page {
            items: decode_data(&response)?,
            details: response.details(),
        })
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// lookup.
    pub async fn fetch(&self, account_id: &str) -> Result<Account, ErrorInfo> {
        let response = self
            .client
            .call(Request::get(format!("accounts/{account_id}")))
            .await?;
        decode_data(&response)
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// account.
    pub async fn create(
        &self,
        account: &AccountInput,
        options: &RequestOptions,
    ) -> Result<Account, ErrorInfo> {
        let request = Request::post("accounts")
            .headers(idempotency_headers(options.idempotency_key.as_deref()))
            .json(account.body()?);
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    /// Sends only the fields set on `account`.
    ///
    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// update.
    pub async fn update(
        &self,
        account_id: &str,
        account: &AccountInput,
        options: &RequestOptions,
    ) -> Result<Account, ErrorInfo> {
        let request = Request::patch(format!("accounts/{account_id}"))
            .headers(idempotency_headers(options.idempotency_key.as_deref()))
            .json(account.body()?);
        let response = self.client.call(request).await?;
        decode_data(&response)
    }

    /// # Errors
    ///
    /// Will return `Err` on network error or if the service rejects the
    /// deletion.
    pub async fn delete(&self, account_id: &str) -> Result<Account, ErrorInfo> {
        let response = self
            .client
            .call(Request::delete(format!("accounts/{account_id}")))
            .await?;
        decode_data(&response)
    }
}
