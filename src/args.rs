use std::time::Duration;

use persona::config::{PollConfig, DEFAULT_HOST};
use serde_json::Value;
use url::Url;

fn host_value_parser(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|err| format!("Invalid API host {raw}: {err}"))?;
    if url.cannot_be_a_base() {
        return Err(format!("API host {raw} cannot be used as a base URL"));
    }
    Ok(raw.to_string())
}

/// `key=value`; the value is read as JSON when it parses, otherwise it is
/// kept as a string.
fn attribute_value_parser(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got {raw}"))?;
    if key.is_empty() {
        return Err("Attribute name cannot be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn id_value_parser(raw: &str) -> Result<String, String> {
    if raw.is_empty() {
        return Err("Id cannot be empty".to_string());
    }
    if raw.contains('/') {
        return Err("Id cannot contain '/'".to_string());
    }
    Ok(raw.to_string())
}

#[derive(clap::Parser)]
#[command(name = "persona-verify")]
#[command(version)]
#[command(about = "Run identity verifications and reports to completion")]
#[command(long_about = "
A command-line tool for running identity verifications and reports.

The service processes verifications asynchronously. By default this tool
creates, submits and then polls the job until it finishes, so one command
gives one final answer. Use --no-wait to return right after submission.

Examples:
  # Verify a business tax id and wait for the result
  persona-verify tin run --name-business 'Acme Inc' --tin 91-1144442

  # Run a watchlist report without waiting
  persona-verify --no-wait report run --template-id rptp_abc \\
    --attr nameFirst=Jane --attr nameLast=Doe

  # Look up a verification
  persona-verify verification get ver_123
")]
pub struct Args {
    /// API key, sent as a bearer token
    #[arg(long, env = "PERSONA_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// API endpoint URL
    #[arg(
        long,
        env = "PERSONA_HOST",
        value_hint = clap::ValueHint::Url,
        value_parser = host_value_parser,
        default_value = DEFAULT_HOST
    )]
    pub host: String,

    /// Return as soon as the job is submitted instead of polling it
    #[arg(long, global = true, default_value_t = false)]
    pub no_wait: bool,

    /// Delay before every status check, in milliseconds
    #[arg(long, global = true, value_name = "MS", default_value_t = 500)]
    pub interval_ms: u64,

    /// Number of status checks before giving up
    #[arg(long, global = true, default_value_t = PollConfig::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    pub const fn poll(&self) -> PollConfig {
        PollConfig::new(Duration::from_millis(self.interval_ms), self.max_attempts)
    }
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Database identity verifications
    #[command(subcommand)]
    Database(DatabaseCommand),

    /// Business tax id (TIN) verifications
    #[command(subcommand)]
    Tin(TinCommand),

    /// Background reports, e.g. watchlist screening
    #[command(subcommand)]
    Report(ReportCommand),

    /// Verifications of any kind
    #[command(subcommand)]
    Verification(LookupCommand),

    /// Inquiries
    #[command(subcommand)]
    Inquiry(LookupCommand),
}

#[derive(clap::Subcommand)]
pub enum DatabaseCommand {
    /// Create, submit and wait for a database identity verification
    ///
    /// Examples:
    ///   persona-verify database run --inquiry inq_123 \
    ///     --name-first Jane --name-last Doe --street '1 Main St' \
    ///     --city Springfield --subdivision IL --postal-code 62701 \
    ///     --ssn 123-45-6789 --birthdate 1980-01-01
    Run(DatabaseRunArgs),
}

#[derive(clap::Args)]
pub struct DatabaseRunArgs {
    /// Inquiry the verification belongs to
    #[arg(long = "inquiry", value_name = "ID", value_parser = id_value_parser)]
    pub inquiry_id: String,

    #[arg(long)]
    pub name_first: String,

    #[arg(long)]
    pub name_last: String,

    /// First address line
    #[arg(long)]
    pub street: String,

    /// Second address line
    #[arg(long)]
    pub street_2: Option<String>,

    #[arg(long)]
    pub city: String,

    /// State or province
    #[arg(long)]
    pub subdivision: String,

    #[arg(long)]
    pub postal_code: String,

    /// National identification number, e.g. an SSN
    #[arg(long = "ssn", value_name = "NUMBER")]
    pub identification_number: String,

    /// Date of birth as YYYY-MM-DD
    #[arg(long)]
    pub birthdate: String,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// ISO 3166-1 alpha-2 country code
    #[arg(long)]
    pub country: Option<String>,

    /// Reuse a key to make retried creations safe
    #[arg(long)]
    pub idempotency_key: Option<String>,
}

#[derive(clap::Subcommand)]
pub enum TinCommand {
    /// Create, submit and wait for a TIN verification
    Run(TinRunArgs),
}

#[derive(clap::Args)]
pub struct TinRunArgs {
    /// Registered business name
    #[arg(long)]
    pub name_business: String,

    /// Taxpayer identification number (EIN)
    #[arg(long)]
    pub tin: String,

    /// Verification template to run
    #[arg(long, env = "PERSONA_TIN_TEMPLATE_ID")]
    pub template_id: Option<String>,
}

#[derive(clap::Subcommand)]
pub enum ReportCommand {
    /// Create a report and wait for it to complete
    Run(ReportRunArgs),

    /// Look up a report
    Get {
        #[arg(value_parser = id_value_parser)]
        id: String,
    },
}

#[derive(clap::Args)]
pub struct ReportRunArgs {
    /// Report template to run
    #[arg(long, value_parser = id_value_parser)]
    pub template_id: String,

    /// Report parameter as key=value, may be repeated
    #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = attribute_value_parser)]
    pub attributes: Vec<(String, Value)>,
}

#[derive(clap::Subcommand)]
pub enum LookupCommand {
    /// Look up one record by id
    Get {
        #[arg(value_parser = id_value_parser)]
        id: String,
    },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use clap::Parser;

    #[test]
    fn test_attribute_values_parse_as_json_when_possible() {
        assert_eq!(
            attribute_value_parser("nameFirst=Jane").unwrap(),
            ("nameFirst".to_string(), Value::String("Jane".to_string()))
        );
        assert_eq!(
            attribute_value_parser("count=3").unwrap(),
            ("count".to_string(), Value::from(3))
        );
        assert!(attribute_value_parser("novalue").is_err());
        assert!(attribute_value_parser("=x").is_err());
    }

    #[test]
    fn test_global_poll_flags() {
        let args = Args::try_parse_from([
            "persona-verify",
            "--api-key",
            "key",
            "report",
            "get",
            "rep_1",
            "--no-wait",
            "--interval-ms",
            "100",
            "--max-attempts",
            "5",
        ])
        .unwrap();
        assert!(args.no_wait);
        assert_eq!(args.poll(), PollConfig::new(Duration::from_millis(100), 5));
    }

    #[test]
    fn test_rejects_non_base_host() {
        assert!(host_value_parser("mailto:ops@example.com").is_err());
        assert!(host_value_parser("https://example.com/api/v1").is_ok());
    }
}
