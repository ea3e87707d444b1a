// crates/govtalk-transport/src/http.rs
// ============================================================================
// Module: Blocking HTTP Transport
// Description: Single-exchange HTTP POST transport for GovTalk envelopes.
// Purpose: Implement the core Transport seam with strict limits.
// Dependencies: govtalk-core, reqwest, serde
// ============================================================================

//! ## Overview
//! The HTTP transport performs exactly one blocking POST per send with a
//! `text/xml` content type and returns the raw reply text. It enforces
//! scheme restrictions, disables redirects, applies a full-lifecycle
//! timeout, and bounds the response size. No retries happen here or
//! anywhere else in the engine; callers own every retry decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use govtalk_core::Transport;
use govtalk_core::TransportError;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::Deserialize;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the blocking HTTP transport.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` gateways.
/// - `max_response_bytes` is enforced as a hard upper bound on reply bodies.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpTransportConfig {
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum reply size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            allow_http: false,
            timeout_ms: 30_000,
            max_response_bytes: 4 * 1024 * 1024,
            user_agent: "govtalk/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Transport Implementation
// ============================================================================

/// Blocking HTTP transport for envelope exchanges.
///
/// # Invariants
/// - One POST per send; redirects are not followed.
/// - Replies exceeding configured limits fail closed.
pub struct HttpTransport {
    /// Transport configuration, including limits and policy.
    config: HttpTransportConfig,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the HTTP client cannot be created.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| TransportError::Exchange("http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, endpoint: &Url, payload: &str) -> Result<String, TransportError> {
        validate_endpoint(endpoint, &self.config)?;
        let mut response = self
            .client
            .post(endpoint.as_str())
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(payload.to_string())
            .send()
            .map_err(|error| TransportError::Exchange(error.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::Exchange(format!(
                "gateway returned status {}",
                response.status().as_u16()
            )));
        }
        let body = read_response_limited(&mut response, self.config.max_response_bytes)?;
        String::from_utf8(body).map_err(|_| TransportError::Encoding)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates the gateway URL scheme policy.
fn validate_endpoint(endpoint: &Url, config: &HttpTransportConfig) -> Result<(), TransportError> {
    match endpoint.scheme() {
        "https" => Ok(()),
        "http" if config.allow_http => Ok(()),
        scheme => Err(TransportError::Exchange(format!(
            "unsupported gateway scheme `{scheme}`"
        ))),
    }
}

/// Reads the reply body while enforcing a byte limit.
fn read_response_limited(
    response: &mut Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| TransportError::Exchange("reply size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(TransportError::Exchange("reply exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle
        .read_to_end(&mut buf)
        .map_err(|_| TransportError::Exchange("failed to read reply".to_string()))?;
    if buf.len() > max_bytes {
        return Err(TransportError::Exchange("reply exceeds size limit".to_string()));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| TransportError::Exchange("invalid reply length".to_string()))?;
        if buf.len() < expected {
            return Err(TransportError::Exchange("reply truncated".to_string()));
        }
    }
    Ok(buf)
}
