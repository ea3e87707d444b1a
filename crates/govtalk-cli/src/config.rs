// crates/govtalk-cli/src/config.rs
// ============================================================================
// Module: CLI Configuration
// Description: TOML configuration model for the govtalk binary.
// Purpose: Load gateway credentials, service selection, and transport limits.
// Dependencies: govtalk-hmrc, govtalk-transport, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The CLI reads one TOML file holding the gateway credentials, the VAT
//! filing service to target, and the transport limits. Credentials never
//! come from command-line arguments, so they stay out of shell history.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use govtalk_hmrc::VatServiceEndpoint;
use govtalk_transport::HttpTransportConfig;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file: {0}")]
    Read(String),
    /// The file could not be parsed as TOML.
    #[error("cannot parse config file: {0}")]
    Parse(String),
    /// The configured service name is not recognised.
    #[error("unknown vat service `{0}`: expected live, tpvs, or vsips")]
    UnknownService(String),
}

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Gateway credentials and service selection.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Gateway sender id.
    pub sender_id: String,
    /// Gateway password.
    pub password: String,
    /// VAT filing service: live, tpvs, or vsips.
    #[serde(default = "default_service")]
    pub service: String,
}

/// Top-level CLI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Gateway credentials and service selection.
    pub gateway: GatewayConfig,
    /// Transport limits; defaults apply when omitted.
    #[serde(default)]
    pub transport: TransportSection,
}

/// Transport section with optional overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransportSection {
    /// Allow cleartext HTTP gateways.
    pub allow_http: Option<bool>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Maximum reply size in bytes.
    pub max_response_bytes: Option<usize>,
}

impl CliConfig {
    /// Loads and parses the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|error| ConfigError::Read(error.to_string()))?;
        toml::from_str(&raw).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    /// Resolves the configured VAT service endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownService`] for any other service name.
    pub fn service_endpoint(&self) -> Result<VatServiceEndpoint, ConfigError> {
        match self.gateway.service.as_str() {
            "live" => Ok(VatServiceEndpoint::Live),
            "tpvs" => Ok(VatServiceEndpoint::Tpvs),
            "vsips" => Ok(VatServiceEndpoint::Vsips),
            other => Err(ConfigError::UnknownService(other.to_string())),
        }
    }

    /// Builds the transport configuration with overrides applied.
    #[must_use]
    pub fn transport_config(&self) -> HttpTransportConfig {
        let mut config = HttpTransportConfig::default();
        if let Some(allow_http) = self.transport.allow_http {
            config.allow_http = allow_http;
        }
        if let Some(timeout_ms) = self.transport.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(max_response_bytes) = self.transport.max_response_bytes {
            config.max_response_bytes = max_response_bytes;
        }
        config
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Default VAT filing service.
fn default_service() -> String {
    "live".to_string()
}
