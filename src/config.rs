//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const ENV_BASE_URL: &str = "OPPORTUNITIES_BASE_URL";
pub const ENV_SESSION_COOKIE: &str = "OPPORTUNITIES_SESSION_COOKIE";
pub const ENV_SESSION_DIR: &str = "OPPORTUNITIES_SESSION_DIR";
pub const ENV_STRICT_STATUS: &str = "OPPORTUNITIES_STRICT_STATUS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "OPPORTUNITIES_REQUEST_TIMEOUT_SECS";

/// How the REST client treats non-2xx responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Parse the body as JSON regardless of status.
    #[default]
    Ignore,
    /// Reject any non-2xx status with [`crate::error::ApiError::Status`].
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without a trailing slash.
    pub base_url: String,
    /// Raw `name=value` cookie pair sent with every request.
    pub session_cookie: Option<String>,
    /// Directory for file-backed session persistence.
    pub session_dir: Option<PathBuf>,
    pub status_policy: StatusPolicy,
    /// Whole-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            session_cookie: None,
            session_dir: None,
            status_policy: StatusPolicy::Ignore,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with every other setting at its default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless `base_url` is an absolute
    /// `http` or `https` URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, ..Self::default() })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `OPPORTUNITIES_BASE_URL`: default `http://localhost:5000`
    /// - `OPPORTUNITIES_SESSION_COOKIE`: cookie pair attached to every request
    /// - `OPPORTUNITIES_SESSION_DIR`: enables file-backed session persistence
    /// - `OPPORTUNITIES_STRICT_STATUS`: boolean, default false
    /// - `OPPORTUNITIES_REQUEST_TIMEOUT_SECS`: unset means no timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or the timeout cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = match env_nonempty(ENV_BASE_URL) {
            Some(raw) => normalize_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_owned(),
        };
        let status_policy = if env_bool(ENV_STRICT_STATUS).unwrap_or(false) {
            StatusPolicy::Strict
        } else {
            StatusPolicy::Ignore
        };
        let request_timeout = parse_timeout_secs(env_nonempty(ENV_REQUEST_TIMEOUT_SECS).as_deref())?;

        Ok(Self {
            base_url,
            session_cookie: env_nonempty(ENV_SESSION_COOKIE),
            session_dir: env_nonempty(ENV_SESSION_DIR).map(PathBuf::from),
            status_policy,
            request_timeout,
        })
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidBaseUrl { url: raw.to_owned(), reason: e.to_string() })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn parse_timeout_secs(raw: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidNumber { var: ENV_REQUEST_TIMEOUT_SECS, value: raw.to_owned() }),
        Ok(secs) => Ok(Some(Duration::from_secs(secs))),
    }
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    env_nonempty(key).and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

fn env_nonempty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
