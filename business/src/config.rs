use std::time::Duration;

use log::info;
use serde::Deserialize;
use thiserror::Error;

/// Prefix of the environment variables read by [`BusinessConfig::from_env`].
pub const ENV_PREFIX: &str = "ROSTER_";

const DEFAULT_API_BASE_URL: &str = "https://reqres.in/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {ENV_PREFIX}* environment variables: {0}")]
    Env(#[from] serde_env::Error),
    #[error("Invalid API base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    /// Base URL of the remote directory, without a trailing slash.
    pub api_base_url: String,
    /// Sent as `x-api-key` on every request when present.
    pub api_key: Option<String>,
    pub request_timeout: Duration,
    /// Lifetime given to freshly issued session credentials. `None` means the
    /// credential never expires locally.
    pub session_ttl: Option<Duration>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_base_url: Option<String>,
    api_key: Option<String>,
    request_timeout_secs: Option<u64>,
    session_ttl_secs: Option<u64>,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = normalize_base_url(&base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = Some(ttl);
        self
    }

    /// Join a path onto the API base URL.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Build the configuration from `ROSTER_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`Self::from_env`] over an explicit variable list.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let scoped: Vec<(String, String)> = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.as_ref()
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_owned(), value.as_ref().to_owned()))
            })
            .collect();

        let raw: RawConfig = serde_env::from_iter(scoped)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let RawConfig {
            api_base_url,
            api_key,
            request_timeout_secs,
            session_ttl_secs,
        } = raw;

        let api_base_url = match api_base_url {
            Some(url) => {
                let parsed = url::Url::parse(&url).map_err(|e| ConfigError::InvalidBaseUrl {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::InvalidBaseUrl {
                        url,
                        reason: "scheme must be http or https".to_owned(),
                    });
                }
                info!("Using API base URL from environment: {url}");
                normalize_base_url(&url)
            }
            None => DEFAULT_API_BASE_URL.to_owned(),
        };

        Ok(Self {
            api_base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            request_timeout: Duration::from_secs(
                request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            session_ttl: session_ttl_secs.map(Duration::from_secs),
        })
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_ttl: None,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}
