use std::collections::BTreeMap;

use crate::api::Request;

pub mod account;
pub mod database;
pub mod inquiry;
pub mod report;
pub mod tin;
pub mod verification;

pub use account::{Account, AccountAttributes, AccountInput, Accounts};
pub use database::{DatabaseVerificationInput, DatabaseVerifications};
pub use inquiry::{CreateInquiry, Inquiries, Inquiry, InquiryAttributes, InquiryStatus};
pub use report::{Report, ReportAttributes, ReportRequest, ReportStatus, Reports};
pub use tin::{TinVerificationInput, TinVerifications};
pub use verification::{
    Verification, VerificationAttributes, VerificationCheck, VerificationStatus, Verifications,
};

/// Per-call options for mutating requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub idempotency_key: Option<String>,
}

impl RequestOptions {
    pub fn idempotent(key: impl Into<String>) -> Self {
        Self {
            idempotency_key: Some(key.into()),
        }
    }
}

pub(crate) fn idempotency_headers(key: Option<&str>) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    if let Some(key) = key.filter(|key| !key.is_empty()) {
        headers.insert("Idempotency-Key".to_owned(), key.to_owned());
    }
    headers
}

/// Paging and filters for list endpoints. Accounts ignore
/// `filter_account_id`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub before_id: Option<String>,
    pub after_id: Option<String>,
    pub size: Option<u32>,
    pub filter_reference_id: Option<String>,
    pub filter_account_id: Option<String>,
}

impl ListOptions {
    pub(crate) fn apply(&self, mut request: Request) -> Request {
        let pairs = [
            ("page[before]", &self.before_id),
            ("page[after]", &self.after_id),
            ("filter[reference-id]", &self.filter_reference_id),
            ("filter[account-id]", &self.filter_account_id),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                request = request.query(name, value.as_str());
            }
        }
        if let Some(size) = self.size {
            request = request.query("page[size]", size);
        }
        request
    }
}
