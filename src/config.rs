use std::{env, fmt, time::Duration};

use crate::errors::ClientError;

pub const DEFAULT_HOST: &str = "https://withpersona.com/api/v1";
pub const DEFAULT_API_VERSION: &str = "2021-07-05";
pub const DEFAULT_KEY_INFLECTION: &str = "camel";

pub const API_KEY_ENV: &str = "PERSONA_API_KEY";
pub const HOST_ENV: &str = "PERSONA_HOST";
pub const API_VERSION_ENV: &str = "PERSONA_VERSION";
pub const TIN_TEMPLATE_ENV: &str = "PERSONA_TIN_TEMPLATE_ID";

/// Pacing of the wait-for-terminal-state loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PollConfig {
    /// Delay before every fetch, including the first one.
    pub interval: Duration,
    /// Number of fetches after which the run reports a timeout.
    pub max_attempts: u32,
}

impl PollConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// A budget of zero still performs one fetch.
    pub const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }

    pub fn budget(&self) -> Duration {
        self.interval * self.attempts()
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Everything needed to talk to the API. Shared by all resource accessors
/// created from one [`Client`](crate::api::Client).
#[derive(Clone)]
pub struct ClientConfig {
    pub host: String,
    pub api_key: String,
    pub api_version: String,
    pub key_inflection: String,
    /// Used by TIN verifications that do not name a template themselves.
    pub tin_template_id: Option<String>,
    pub poll: PollConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            key_inflection: DEFAULT_KEY_INFLECTION.to_owned(),
            tin_template_id: None,
            poll: PollConfig::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `Err` when `PERSONA_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ClientError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(host) = env::var(HOST_ENV) {
            config.host = host;
        }
        if let Ok(version) = env::var(API_VERSION_ENV) {
            config.api_version = version;
        }
        config.tin_template_id = env::var(TIN_TEMPLATE_ENV).ok().filter(|id| !id.is_empty());
        Ok(config)
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    #[must_use]
    pub fn with_tin_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.tin_template_id = Some(template_id.into());
        self
    }

    #[must_use]
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("key_inflection", &self.key_inflection)
            .field("tin_template_id", &self.tin_template_id)
            .field("poll", &self.poll)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_poll_budget_is_thirty_seconds() {
        let poll = PollConfig::default();
        assert_eq!(poll.interval, Duration::from_millis(500));
        assert_eq!(poll.max_attempts, 60);
        assert_eq!(poll.budget(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_attempts_still_fetches_once() {
        let poll = PollConfig::new(Duration::from_millis(10), 0);
        assert_eq!(poll.attempts(), 1);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ClientConfig::new("persona_sandbox_secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("persona_sandbox_secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let config = ClientConfig::new("key")
            .with_host("http://localhost:8080/api/v1")
            .with_tin_template_id("vtmpl_123")
            .with_poll(PollConfig::new(Duration::from_millis(5), 3));
        assert_eq!(config.host, "http://localhost:8080/api/v1");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.tin_template_id.as_deref(), Some("vtmpl_123"));
        assert_eq!(config.poll.max_attempts, 3);
    }
}
