// crates/pulsegate-gateway/src/client.rs
// ============================================================================
// Module: Gateway Client
// Description: Reqwest-backed client for the monitoring backend REST API.
// Purpose: Issue authenticated, timeout-bounded requests with typed failures.
// Dependencies: reqwest, async-trait, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! The client prefixes every path with the backend's `/api/v1` mount,
//! authenticates with a per-call bearer token when the invoking context
//! supplies one (falling back to the static service key header), and
//! unwraps the backend's `{data: ...}` response envelope. Failures map to
//! [`GatewayError`]: a timeout is its own variant, non-2xx responses carry
//! the body's `message`/`error` text when present, and transport faults
//! become network errors with status 0.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path prefix for every backend API route.
const API_PREFIX: &str = "/api/v1";
/// Header carrying the static service-level key.
const API_KEY_HEADER: &str = "x-api-key";
/// Default request timeout when the caller does not override it.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3200";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Gateway client configuration.
///
/// Constructed explicitly by the caller; the client itself never reads the
/// process environment.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL, scheme and host only.
    pub base_url: String,
    /// Static service-level API key.
    pub api_key: String,
    /// Default request timeout in milliseconds.
    pub default_timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: "pulsegate/0.1".to_string(),
        }
    }
}

/// Per-call options for a gateway request.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Timeout override; falls back to the configured default.
    pub timeout: Option<Duration>,
    /// Bearer token supplied by the invoking context.
    pub auth_token: Option<String>,
}

impl CallOptions {
    /// Creates options carrying the invoking context's bearer token, if any.
    #[must_use]
    pub fn authorized(auth_token: Option<&str>) -> Self {
        Self {
            timeout: None,
            auth_token: auth_token.map(str::to_string),
        }
    }

    /// Sets a per-call timeout override.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Gateway failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request exceeded its deadline.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Deadline that was exceeded, in milliseconds.
        timeout_ms: u64,
    },
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body or status line.
        message: String,
    },
    /// Transport-level failure before a response arrived.
    #[error("{0}")]
    Network(String),
    /// The response payload did not match the expected shape.
    #[error("invalid response payload: {0}")]
    Decode(String),
    /// The configured base URL or request path is not a valid URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// Returns the HTTP-equivalent status for the failure: 408 for timeouts,
    /// the response status for HTTP errors, and 0 for everything that failed
    /// before a response existed.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Timeout {
                ..
            } => 408,
            Self::Http {
                status, ..
            } => *status,
            Self::Network(_) | Self::Decode(_) | Self::InvalidUrl(_) => 0,
        }
    }
}

/// Decodes a gateway payload into a typed value.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] when the payload does not match `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|err| GatewayError::Decode(err.to_string()))
}

// ============================================================================
// SECTION: Gateway Trait
// ============================================================================

/// Backend access seam consumed by tool handlers.
///
/// The production implementation is [`GatewayClient`]; tests substitute
/// in-memory stubs.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Issues a GET request against an API path.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the request fails or the backend
    /// answers with a non-2xx status.
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        options: &CallOptions,
    ) -> Result<Value, GatewayError>;

    /// Issues a POST request against an API path.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the request fails or the backend
    /// answers with a non-2xx status.
    async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        options: &CallOptions,
    ) -> Result<Value, GatewayError>;
}

// ============================================================================
// SECTION: Client Implementation
// ============================================================================

/// Production gateway client.
pub struct GatewayClient {
    /// Client configuration.
    config: GatewayConfig,
    /// Parsed base URL.
    base_url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl GatewayClient {
    /// Creates a new gateway client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the base URL does not parse or the
    /// HTTP client cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| GatewayError::Network(err.to_string()))?;
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Builds the absolute request URL for an API path.
    fn request_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, GatewayError> {
        let mut url = self
            .base_url
            .join(&format!("{API_PREFIX}{path}"))
            .map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues a request and normalizes the response or failure.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
        options: &CallOptions,
    ) -> Result<Value, GatewayError> {
        let url = self.request_url(path, query)?;
        let timeout = options
            .timeout
            .unwrap_or_else(|| Duration::from_millis(self.config.default_timeout_ms));
        let mut request = self
            .client
            .request(method, url)
            .timeout(timeout)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        request = match &options.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request.header(API_KEY_HEADER, &self.config.api_key),
        };
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                GatewayError::Timeout {
                    timeout_ms: timeout_millis(timeout),
                }
            } else {
                GatewayError::Network(err.to_string())
            }
        })?;
        let status = response.status();
        // Bodies that fail to parse still classify by status alone.
        let payload: Value = response.json().await.unwrap_or(Value::Null);
        if status.is_success() {
            Ok(unwrap_envelope(payload))
        } else {
            Err(GatewayError::Http {
                status: status.as_u16(),
                message: error_message(status, &payload),
            })
        }
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        options: &CallOptions,
    ) -> Result<Value, GatewayError> {
        self.request(Method::GET, path, query, None, options).await
    }

    async fn post(
        &self,
        path: &str,
        body: Option<Value>,
        options: &CallOptions,
    ) -> Result<Value, GatewayError> {
        self.request(Method::POST, path, &[], body, options).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Unwraps the backend's `{data: ...}` response envelope when present.
fn unwrap_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Extracts the most specific error message from a failure response body.
fn error_message(status: StatusCode, payload: &Value) -> String {
    payload
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("error").and_then(Value::as_str))
        .map_or_else(
            || {
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                )
            },
            str::to_string,
        )
}

/// Converts a timeout duration to whole milliseconds, saturating on overflow.
fn timeout_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only panic-based assertions are permitted."
    )]

    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_unwraps_data_field() {
        assert_eq!(unwrap_envelope(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({"data": null})), Value::Null);
    }

    #[test]
    fn envelope_passes_through_plain_payloads() {
        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_envelope(json!({"id": "svc-1"})), json!({"id": "svc-1"}));
    }

    #[test]
    fn error_message_prefers_body_message() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(error_message(status, &json!({"message": "bad filter"})), "bad filter");
        assert_eq!(error_message(status, &json!({"error": "nope"})), "nope");
        assert_eq!(error_message(status, &Value::Null), "HTTP 400 Bad Request");
    }

    #[test]
    fn failure_status_mapping() {
        let timeout = GatewayError::Timeout {
            timeout_ms: 5_000,
        };
        let http = GatewayError::Http {
            status: 503,
            message: "unavailable".to_string(),
        };
        let network = GatewayError::Network("refused".to_string());
        assert_eq!(timeout.status(), 408);
        assert_eq!(http.status(), 503);
        assert_eq!(network.status(), 0);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = GatewayClient::new(GatewayConfig {
            base_url: "not a url".to_string(),
            ..GatewayConfig::default()
        });
        assert!(matches!(result, Err(GatewayError::InvalidUrl(_))));
    }
}
