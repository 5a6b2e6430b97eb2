//! Error types for configuration and REST transport.
//!
//! ERROR HANDLING
//! ==============
//! Library calls return these typed errors; the session bootstrap is the one
//! boundary that collapses every [`ApiError`] into "no user".

/// Error returned by [`crate::net::api::ApiClient`] requests.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection, TLS, or body-read failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The configured session cookie is not a valid header value.
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    /// The request payload could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    /// The response body was not JSON, or not the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
    /// Non-2xx status under [`crate::config::StatusPolicy::Strict`].
    #[error("server responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Error returned while building a [`crate::config::ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid value for {var}: `{value}`")]
    InvalidNumber { var: &'static str, value: String },
}
