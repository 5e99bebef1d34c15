#![allow(clippy::unwrap_used)]

use std::time::Duration;

use persona::{
    api::{Client, TransportError},
    config::ClientConfig,
    errors::{Cause, ClientError, ErrorInfo, ErrorKind},
};
use reqwest::StatusCode;
use url::Url;

#[test]
fn test_local_error_with_suggestions() {
    let error = ErrorInfo::local("send either a templateId, or an inquiryTemplateId");
    let message = format!("{error}");

    assert!(message.contains("[E101]"));
    assert!(message.contains("Suggestions:"));
    assert!(message.contains("Supply exactly one field of each alternative pair"));
    assert_eq!(error.kind(), ErrorKind::Local);
}

#[test]
fn test_remote_error_lists_every_cause() {
    let error = ErrorInfo::Remote {
        status: Some(StatusCode::UNPROCESSABLE_ENTITY),
        causes: vec![
            Cause::new("Invalid birthdate", "must be a date"),
            Cause::new("Missing field", ""),
        ],
    };
    let message = format!("{error}");

    assert!(message.contains("[E102]"));
    assert!(message.contains("422"));
    assert!(message.contains("- Invalid birthdate: must be a date"));
    assert!(message.contains("- Missing field"));
    assert_eq!(error.causes().len(), 2);
}

#[test]
fn test_remote_error_without_status() {
    let error = ErrorInfo::Remote {
        status: None,
        causes: vec![],
    };
    let message = format!("{error}");

    assert!(message.starts_with("[E102] Service rejected the request:"));
    assert!(message.contains("no error detail returned"));
}

#[test]
fn test_timeout_error_names_subject_and_budget() {
    let error = ErrorInfo::Timeout {
        subject: "TIN verification ver_1".to_owned(),
        attempts: 60,
        waited: Duration::from_secs(30),
    };
    let message = format!("{error}");

    assert!(message.contains("[E105]"));
    assert!(message.contains("60 attempts"));
    assert!(message.contains("TIN verification ver_1"));
    assert!(message.contains("check its status later"));

    let cause = &error.causes()[0];
    assert_eq!(cause.title, "Timed out waiting for TIN verification ver_1");
    assert!(cause.detail.contains("never completed"));
}

#[test]
fn test_transport_error_converts_with_code() {
    let error = ErrorInfo::from(TransportError::Connection("connection refused".to_owned()));
    let message = format!("{error}");

    assert_eq!(error.error_code(), "E103");
    assert!(message.contains("[E203] Connection failed: connection refused"));
    assert!(message.contains("Check your network connection"));
}

#[test]
fn test_client_rejects_unusable_configuration() {
    let missing_key = Client::new(ClientConfig::new("")).err().unwrap();
    assert_eq!(missing_key.error_code(), "E003");
    assert!(format!("{missing_key}").contains("PERSONA_API_KEY"));

    let not_a_base = Client::new(ClientConfig::new("key").with_host("mailto:ops@example.com"))
        .err()
        .unwrap();
    assert_eq!(not_a_base.error_code(), "E001");
    assert!(matches!(not_a_base, ClientError::CannotBeBase(_)));

    let malformed = Client::new(ClientConfig::new("key").with_host("not a url"))
        .err()
        .unwrap();
    assert_eq!(malformed.error_code(), "E002");
}

#[test]
fn test_cannot_be_base_message_shows_url() {
    let url = Url::parse("mailto:ops@example.com").unwrap();
    let message = format!("{}", ClientError::CannotBeBase(url));

    assert!(message.contains("[E001]"));
    assert!(message.contains("mailto:ops@example.com"));
    assert!(message.contains("Provide a valid HTTP or HTTPS URL"));
}
