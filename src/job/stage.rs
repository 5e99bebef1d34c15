use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

use crate::errors::ErrorInfo;

/// Where a multi-stage run currently is, or where it stopped.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Create,
    Submit,
    Processing,
    Complete,
}

impl Stage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Submit => "submit",
            Self::Processing => "processing",
            Self::Complete => "complete",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform outcome of [`JobRunner::run`](super::JobRunner::run).
///
/// Only the constructors below build one, so the pairing of `stage`,
/// `resource` and `error` always holds:
/// - a failed run carries an error and the stage that produced it;
/// - `Processing` only appears on failure, when the poll budget ran out;
/// - `Complete` is always a success.
#[derive(Clone, Debug)]
pub struct RunResult<R> {
    stage: Stage,
    resource: Option<R>,
    error: Option<ErrorInfo>,
}

impl<R> RunResult<R> {
    /// Polling observed a terminal state.
    pub const fn complete(resource: R) -> Self {
        Self {
            stage: Stage::Complete,
            resource: Some(resource),
            error: None,
        }
    }

    /// Fire-and-forget run that returned right after `stage`.
    pub fn dispatched(stage: Stage, resource: R) -> Self {
        debug_assert!(matches!(stage, Stage::Create | Stage::Submit));
        Self {
            stage,
            resource: Some(resource),
            error: None,
        }
    }

    pub fn failed(stage: Stage, error: ErrorInfo) -> Self {
        debug_assert!(matches!(stage, Stage::Create | Stage::Submit));
        Self {
            stage,
            resource: None,
            error: Some(error),
        }
    }

    /// The poll budget ran out; `last_seen` is the most recent snapshot.
    pub const fn timed_out(error: ErrorInfo, last_seen: Option<R>) -> Self {
        Self {
            stage: Stage::Processing,
            resource: last_seen,
            error: Some(error),
        }
    }

    pub const fn success(&self) -> bool {
        self.error.is_none()
    }

    pub const fn stage(&self) -> Stage {
        self.stage
    }

    pub const fn resource(&self) -> Option<&R> {
        self.resource.as_ref()
    }

    pub const fn error(&self) -> Option<&ErrorInfo> {
        self.error.as_ref()
    }

    pub fn into_resource(self) -> Option<R> {
        self.resource
    }

    /// # Errors
    ///
    /// Returns the failing stage with its error when the run did not
    /// succeed.
    pub fn into_result(self) -> Result<R, StageError> {
        match (self.error, self.resource) {
            (Some(error), _) => Err(StageError {
                stage: self.stage,
                error,
            }),
            (None, Some(resource)) => Ok(resource),
            (None, None) => Err(StageError {
                stage: self.stage,
                error: ErrorInfo::Malformed {
                    message: "run finished without a resource".to_owned(),
                },
            }),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("{stage} stage failed: {error}")]
pub struct StageError {
    pub stage: Stage,
    pub error: ErrorInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stage_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Stage::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(Stage::Submit.to_string(), "submit");
    }

    #[test]
    fn test_complete_is_success() {
        let result = RunResult::complete("ver_1");
        assert!(result.success());
        assert_eq!(result.stage(), Stage::Complete);
        assert_eq!(result.into_result(), Ok("ver_1"));
    }

    #[test]
    fn test_failed_keeps_stage_and_error() {
        let result: RunResult<&str> = RunResult::failed(Stage::Submit, ErrorInfo::local("nope"));
        assert!(!result.success());
        assert_eq!(result.stage(), Stage::Submit);
        assert!(result.resource().is_none());
        let err = result.into_result().unwrap_err();
        assert_eq!(err.stage, Stage::Submit);
        assert!(err.to_string().starts_with("submit stage failed"));
    }

    #[test]
    fn test_timed_out_reports_processing_with_snapshot() {
        let error = ErrorInfo::Timeout {
            subject: "report rep_1".to_owned(),
            attempts: 60,
            waited: Duration::from_secs(30),
        };
        let result = RunResult::timed_out(error, Some("rep_1"));
        assert!(!result.success());
        assert_eq!(result.stage(), Stage::Processing);
        assert_eq!(result.resource(), Some(&"rep_1"));
    }

    #[test]
    fn test_dispatched_is_success_at_creation_stage() {
        let result = RunResult::dispatched(Stage::Create, "rep_1");
        assert!(result.success());
        assert_eq!(result.stage(), Stage::Create);
    }
}
