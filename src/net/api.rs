//! REST helpers for communicating with the backend origin.
//!
//! Every call joins `path` onto the configured base URL, attaches ambient
//! credentials (cookie jar plus the optional configured session cookie), and
//! parses the response body as JSON.
//!
//! ERROR HANDLING
//! ==============
//! Under the default [`StatusPolicy::Ignore`] the HTTP status is not
//! inspected: an error body is decoded exactly like a success body, and a
//! caller asking for a typed result fails only when the shape does not match.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use reqwest::Method;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, StatusPolicy};
use crate::error::ApiError;

/// Resource returning the authenticated user.
pub const WHO_AM_I_PATH: &str = "@me";

/// Resource ending the server-side session.
pub const LOGOUT_PATH: &str = "logout";

/// HTTP client bound to one backend origin.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    status_policy: StatusPolicy,
}

impl ApiClient {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cookie is not a valid header value or
    /// the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        }

        let builder = reqwest::Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        let builder = {
            let builder = builder.cookie_store(true);
            match config.request_timeout {
                Some(timeout) => builder.timeout(timeout),
                None => builder,
            }
        };

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            status_policy: config.status_policy,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// `GET <base>/<path>`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-JSON bodies, or (strict policy only)
    /// non-2xx statuses.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, None).await
    }

    /// `POST <base>/<path>` with `data` as the JSON body.
    ///
    /// A `data` value that serializes to JSON `null` (`()`, `None`) sends no
    /// body and no `Content-Type`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`], plus [`ApiError::Encode`] when `data`
    /// cannot be serialized.
    pub async fn post<T, B>(&self, path: &str, data: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(data)?;
        self.send(Method::POST, path, body).await
    }

    /// `PUT <base>/<path>`; body handling matches [`ApiClient::post`].
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn put<T, B>(&self, path: &str, data: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(data)?;
        self.send(Method::PUT, path, body).await
    }

    /// `DELETE <base>/<path>`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn del<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, None).await
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, has_body = body.is_some(), "api request");

        let request = self.http.request(method.clone(), &url);
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();
        let request = if let Some(json) = body {
            request.json(&json)
        } else {
            request
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(%method, %url, status = status.as_u16(), len = bytes.len(), "api response");

        if self.status_policy == StatusPolicy::Strict && !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }
}

/// Serialize a request payload; JSON `null` means "no body".
pub(crate) fn encode_body<B: Serialize + ?Sized>(data: &B) -> Result<Option<Value>, ApiError> {
    match serde_json::to_value(data).map_err(ApiError::Encode)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

/// Join with exactly one `/` between origin and path.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}
