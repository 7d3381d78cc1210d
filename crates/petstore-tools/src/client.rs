//! Shared transport client.
//!
//! One long-lived `reqwest::Client` per process: pooled connections, fixed
//! per-call timeout, bearer auth applied only when a token is configured.
//! Also hosts the response normalizer that maps transport outcomes into
//! either a decoded JSON value or a typed error.

use crate::error::{PetstoreToolsError, Result};
use crate::request::BuiltRequest;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Process-wide transport configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base URL the operation paths are appended to.
    pub base_url: String,
    /// Bearer token for the `Authorization` header. When `None`, no auth
    /// header is sent at all (never an empty-valued one).
    pub bearer_token: Option<String>,
    /// Hard per-call timeout; a hung call is aborted, not retried.
    pub timeout: Duration,
}

impl TransportConfig {
    /// Public demo endpoint used when `API_BASE_URL` is unset.
    pub const DEFAULT_BASE_URL: &'static str = "https://petstore.swagger.io/v2";

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Read configuration from `API_BASE_URL` / `API_KEY`.
    ///
    /// An empty `API_KEY` counts as unset, matching the upstream adapters.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = get("API_BASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        let bearer_token = get("API_KEY").filter(|v| !v.is_empty());

        Self {
            base_url,
            bearer_token,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_URL)
    }
}

/// Long-lived HTTP client shared by all invocations.
///
/// Safe for concurrent use; the only shared state is the connection pool,
/// and a failed call never poisons it for subsequent ones.
#[derive(Debug, Clone)]
pub struct TransportClient {
    client: Client,
    config: TransportConfig,
}

impl TransportClient {
    /// Build the client, validating the configured base URL up front.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the base URL does not parse.
    pub fn new(config: TransportConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| {
            PetstoreToolsError::Config(format!("Invalid baseUrl '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Execute a built request and normalize the outcome.
    ///
    /// # Errors
    ///
    /// - `Transport` when no response was received (connect failure, timeout)
    /// - `Remote { status, body }` for HTTP status >= 400, payload passed
    ///   through unreinterpreted
    /// - `Decode` when a success body is not valid JSON
    pub async fn execute(&self, request: &BuiltRequest) -> Result<Value> {
        self.execute_with_timeout(request, self.config.timeout).await
    }

    /// Execute with a caller-supplied timeout instead of the process default.
    ///
    /// # Errors
    ///
    /// Same kinds as [`TransportClient::execute`].
    pub async fn execute_with_timeout(
        &self,
        request: &BuiltRequest,
        timeout: Duration,
    ) -> Result<Value> {
        let url = self.build_url(&request.path, &request.query)?;
        tracing::debug!(method = %request.method, path = %request.path, "executing API request");

        let mut req = self
            .client
            .request(request.method.clone(), url)
            .timeout(timeout);
        if let Some(token) = &self.config.bearer_token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| PetstoreToolsError::Transport(sanitize_reqwest_error(&e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PetstoreToolsError::Transport(sanitize_reqwest_error(&e)))?;

        if status.is_success() {
            decode_success_body(&bytes)
        } else {
            Err(PetstoreToolsError::Remote {
                status: status.as_u16(),
                body: lenient_json(&bytes),
            })
        }
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        let joined = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&joined)
            .map_err(|e| PetstoreToolsError::Config(format!("Invalid request URL: {e}")))?;

        if !query.is_empty() {
            let mut qs = String::new();
            for (i, (key, value)) in query.iter().enumerate() {
                if i > 0 {
                    qs.push('&');
                }
                qs.push_str(&encode_query_component(key));
                qs.push('=');
                qs.push_str(&encode_query_component(value));
            }
            url.set_query(Some(&qs));
        }

        Ok(url)
    }
}

fn decode_success_body(bytes: &[u8]) -> Result<Value> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| PetstoreToolsError::Decode(e.to_string()))
}

/// Parse error payloads as JSON when possible, otherwise keep them as text
/// so the caller still sees what the server said.
fn lenient_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn encode_query_component(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

/// Strip credentials/query from a URL before it lands in an error message.
fn redact_url(url: &Url) -> String {
    let mut u = url.clone();
    let _ = u.set_username("");
    let _ = u.set_password(None);
    u.set_query(None);
    u.set_fragment(None);
    u.to_string()
}

fn sanitize_reqwest_error(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    if let Some(u) = e.url() {
        msg = msg.replace(u.as_str(), &redact_url(u));
    }
    msg
}
