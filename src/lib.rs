//! # Persona Client
//!
//! A Rust client for an identity-verification REST API. Verifications and
//! reports are processed asynchronously by the service; this library can
//! drive them to completion so callers see a single synchronous run.
//!
//! ## Features
//!
//! - **Synchronous runs**: Create, submit and poll a job until it finishes
//! - **Bounded polling**: Fixed interval and attempt budget, never blocking a thread
//! - **Stage reporting**: Failures say whether create, submit or processing broke
//! - **Error Handling**: Error types with codes and actionable suggestions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use persona::{api::Client, config::ClientConfig, resources::TinVerificationInput};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::from_env()?)?;
//!
//! let input = TinVerificationInput {
//!     name_business: "Acme Inc".to_owned(),
//!     tin: "91-1144442".to_owned(),
//!     ..TinVerificationInput::default()
//! };
//! let result = client.verifications().tin().run(&input, true).await;
//! println!("{} at stage {}", result.success(), result.stage());
//! # Ok(())
//! # }
//! ```

/// API client, transport seam and wire records
pub mod api;

/// Client and polling configuration
pub mod config;

/// Error types with actionable suggestions
pub mod errors;

/// Create, submit and poll orchestration
pub mod job;

/// Inquiries, verifications and reports
pub mod resources;

/// Input checks applied before anything is sent
pub mod validation;
