use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    api::{decode_record, envelope, Client, Record, Request},
    errors::ErrorInfo,
    job::{Accessor, Exhausted, JobRunner, RunResult},
};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Ready,
    Errored,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAttributes {
    pub status: Option<ReportStatus>,
    pub created_at: Option<String>,
    pub submitted_at: Option<String>,
    pub completed_at: Option<String>,
    pub redacted_at: Option<String>,
    pub report_template_version_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub type Report = Record<ReportAttributes>;

impl Record<ReportAttributes> {
    pub const fn is_completed(&self) -> bool {
        self.attributes.completed_at.is_some()
    }
}

/// What to run and with which parameters. The template decides what the
/// report looks for; `attributes` are passed through untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportRequest {
    pub report_template_id: String,
    pub attributes: Map<String, Value>,
}

impl ReportRequest {
    pub fn new(report_template_id: impl Into<String>) -> Self {
        Self {
            report_template_id: report_template_id.into(),
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    fn body(&self) -> Value {
        let mut attributes = self.attributes.clone();
        attributes.insert(
            "reportTemplateId".to_owned(),
            Value::String(self.report_template_id.clone()),
        );
        envelope(None, Value::Object(attributes))
    }
}

/// Background reports. Creating one starts it; it is finished once it
/// carries a completion timestamp.
#[derive(Clone)]
pub struct Reports {
    client: Client,
}

impl Reports {
    pub(crate) const fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn run(&self, request: &ReportRequest, synchronous: bool) -> RunResult<Report> {
        self.runner().run(request, synchronous).await
    }

    /// Waits for a report created earlier, e.g. by a fire-and-forget run.
    ///
    /// # Errors
    ///
    /// Returns `ErrorInfo::Timeout` when the report doesn't complete within
    /// the poll budget.
    pub async fn wait_for(&self, report_id: &str) -> Result<Report, ErrorInfo> {
        self.runner()
            .wait_for(report_id)
            .await
            .map_err(|Exhausted { error, .. }| error)
    }

    fn runner(&self) -> JobRunner<Self> {
        JobRunner::new(self.clone()).with_poll(self.client.poll_config())
    }
}

#[async_trait]
impl Accessor for Reports {
    type Input = ReportRequest;
    type Resource = Report;

    fn kind(&self) -> &'static str {
        "report"
    }

    async fn create(&self, request: &ReportRequest) -> Result<Report, ErrorInfo> {
        let response = self
            .client
            .call(Request::post("reports").json(request.body()))
            .await?;
        decode_record(&response)
    }

    async fn fetch(&self, id: &str) -> Result<Report, ErrorInfo> {
        let response = self
            .client
            .call(Request::get(format!("reports/{id}")))
            .await?;
        decode_record(&response)
    }

    fn is_terminal(&self, report: &Report) -> bool {
        report.is_completed()
    }
}
