//! Transport trait and its reqwest implementation
//!
//! Provides the single capability the rest of the crate needs:
//! send a verb with an optional JSON body to a path, get JSON back or a
//! typed error.

use super::rate_limit::Throttle;
use crate::config::ClusterConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, Method};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, warn};

/// Issues requests against a connect cluster's REST endpoint.
///
/// Implementations must be safe to share between concurrent callers and
/// must not retry on their own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `method` to `path` (absolute, starting with `/`).
    ///
    /// Returns the parsed response body, or `JsonValue::Null` when the
    /// cluster answered with an empty body.
    async fn send(&self, method: Method, path: &str, body: Option<&JsonValue>)
        -> Result<JsonValue>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
    throttle: Option<Throttle>,
}

impl HttpTransport {
    /// Build a transport for the cluster described by `config`
    pub fn new(config: &ClusterConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        for (key, value) in &config.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::config(format!("invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("invalid value for header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            timeout: config.timeout,
            throttle: config.throttle.as_ref().map(Throttle::new),
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Turn a completed exchange into the body or a typed error
    async fn read_response(&self, path: &str, response: Response) -> Result<JsonValue> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::unreachable(format!("reading response from {path}: {e}")))?;

        if status.is_success() {
            if text.trim().is_empty() {
                return Ok(JsonValue::Null);
            }
            return serde_json::from_str(&text)
                .map_err(|e| Error::decode(path, format!("invalid JSON body: {e}")));
        }

        Err(Error::from_status(status.as_u16(), error_message(&text, status)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&JsonValue>,
    ) -> Result<JsonValue> {
        if let Some(ref throttle) = self.throttle {
            throttle.wait().await;
        }

        let url = self.build_url(path);
        let mut req = self.client.request(method.into(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!("{} {} timed out after {:?}", method, url, self.timeout);
                return Err(Error::unreachable(format!(
                    "{method} {path} timed out after {}ms",
                    self.timeout.as_millis()
                )));
            }
            Err(e) => {
                warn!("{} {} failed: {}", method, url, e);
                return Err(Error::unreachable(format!("{method} {path}: {e}")));
            }
        };

        debug!(
            idempotent = method.is_idempotent(),
            "{} {} -> {}",
            method,
            path,
            response.status().as_u16()
        );
        self.read_response(path, response).await
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("has_throttle", &self.throttle.is_some())
            .finish_non_exhaustive()
    }
}

/// Extract the message from an error body.
///
/// The cluster answers errors with `{"error_code": n, "message": "..."}`;
/// anything else is passed through verbatim.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(JsonValue::Object(map)) = serde_json::from_str::<JsonValue>(body) {
        if let Some(message) = map.get("message").and_then(JsonValue::as_str) {
            return message.to_string();
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no message")
            .to_string()
    } else {
        body.to_string()
    }
}
