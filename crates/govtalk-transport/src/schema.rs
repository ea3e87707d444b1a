// crates/govtalk-transport/src/schema.rs
// ============================================================================
// Module: Schema Reachability Gate
// Description: Pass/fail validation gate over the additional schema location.
// Purpose: Reject exchanges when the schema is unreachable or XML is broken.
// Dependencies: govtalk-core, reqwest, serde, xmltree
// ============================================================================

//! ## Overview
//! The gate implements the core `SchemaGate` seam: it confirms the
//! configured schema resource is reachable (anything 404-equivalent is a
//! hard failure of the exchange, never a skip) and that the candidate
//! document is well-formed XML. Full XSD validation sits outside the
//! pass/fail contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use govtalk_core::SchemaGate;
use govtalk_core::SchemaGateError;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use serde::Deserialize;
use url::Url;
use xmltree::Element;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the schema reachability gate.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` schema locations.
/// - `timeout_ms` applies to the full reachability probe.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchemaGateConfig {
    /// Allow cleartext HTTP schema locations (disabled by default).
    pub allow_http: bool,
    /// Probe timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for the probe.
    pub user_agent: String,
}

impl Default for SchemaGateConfig {
    fn default() -> Self {
        Self {
            allow_http: false,
            timeout_ms: 10_000,
            user_agent: "govtalk/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Gate Implementation
// ============================================================================

/// Schema gate probing reachability and checking well-formedness.
///
/// # Invariants
/// - An unreachable schema fails the exchange; validation is never skipped
///   silently once enabled.
pub struct ReachabilitySchemaGate {
    /// Gate configuration.
    config: SchemaGateConfig,
    /// HTTP client used for the reachability probe.
    client: Client,
}

impl ReachabilitySchemaGate {
    /// Creates a gate with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGateError`] when the HTTP client cannot be created.
    pub fn new(config: SchemaGateConfig) -> Result<Self, SchemaGateError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|_| SchemaGateError::Unreachable("http client build failed".to_string()))?;
        Ok(Self {
            config,
            client,
        })
    }
}

impl SchemaGate for ReachabilitySchemaGate {
    fn check(&self, schema: &Url, document: &str) -> Result<(), SchemaGateError> {
        match schema.scheme() {
            "https" => {}
            "http" if self.config.allow_http => {}
            scheme => {
                return Err(SchemaGateError::Unreachable(format!(
                    "unsupported schema scheme `{scheme}`"
                )));
            }
        }
        let probe = self
            .client
            .get(schema.as_str())
            .send()
            .map_err(|error| SchemaGateError::Unreachable(error.to_string()))?;
        if !probe.status().is_success() {
            return Err(SchemaGateError::Unreachable(format!(
                "schema probe returned status {}",
                probe.status().as_u16()
            )));
        }
        Element::parse(document.as_bytes())
            .map_err(|error| SchemaGateError::Rejected(error.to_string()))?;
        Ok(())
    }
}
