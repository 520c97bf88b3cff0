use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, TranscripticError};

/// Root of the Transcriptic web API.
pub const DEFAULT_BASE_URL: &str = "https://secure.transcriptic.com";

pub const ENV_EMAIL: &str = "TRANSCRIPTIC_EMAIL";
pub const ENV_TOKEN: &str = "TRANSCRIPTIC_TOKEN";
pub const ENV_BASE_URL: &str = "TRANSCRIPTIC_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "TRANSCRIPTIC_TIMEOUT_SECS";

// ---------------------------------------------------------------------------
// Client configuration
// ---------------------------------------------------------------------------

/// Everything needed to build a [`TranscripticClient`](crate::TranscripticClient).
///
/// Host applications can embed this in their own configuration file; only
/// `email` and `token` are required:
///
/// ```
/// use transcriptic_client::ClientConfig;
///
/// let config: ClientConfig =
///     serde_json::from_str(r#"{ "email": "me@lab.org", "token": "s3cret" }"#).unwrap();
/// assert_eq!(config.base_url, "https://secure.transcriptic.com");
/// ```
///
/// A token can be obtained at <https://secure.transcriptic.com/users/edit>.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Sent as `X-User-Email` on every request.
    pub email: String,
    /// Sent as `X-User-Token` on every request.
    pub token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Overall request timeout in milliseconds. `None` keeps the transport
    /// default; zero is rejected when the client is built.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl ClientConfig {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
            base_url: default_base_url(),
            timeout_ms: None,
            user_agent: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout. Sub-millisecond remainders round up.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_nanos().div_ceil(1_000_000);
        self.timeout_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Read the configuration from `TRANSCRIPTIC_*` environment variables.
    ///
    /// `TRANSCRIPTIC_EMAIL` and `TRANSCRIPTIC_TOKEN` are required;
    /// `TRANSCRIPTIC_BASE_URL` and `TRANSCRIPTIC_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = lookup(ENV_EMAIL).ok_or(TranscripticError::MissingCredential(ENV_EMAIL))?;
        let token = lookup(ENV_TOKEN).ok_or(TranscripticError::MissingCredential(ENV_TOKEN))?;

        let mut config = Self::new(email, token);
        if let Some(url) = lookup(ENV_BASE_URL).filter(|u| !u.is_empty()) {
            config.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                TranscripticError::InvalidConfig(format!("{ENV_TIMEOUT_SECS}={raw:?}: {e}"))
            })?;
            if secs == 0 {
                return Err(TranscripticError::InvalidConfig(format!(
                    "{ENV_TIMEOUT_SECS} must be at least 1"
                )));
            }
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
