// crates/govtalk-core/src/interfaces/mod.rs
// ============================================================================
// Module: GovTalk Interfaces
// Description: Backend-agnostic seams for transport, auth, digest, and schema.
// Purpose: Define the contract surfaces the envelope engine composes over.
// Dependencies: crate::core, thiserror, url
// ============================================================================

//! ## Overview
//! Interfaces define how the envelope engine integrates with its external
//! collaborators without embedding any of their details: the HTTP transport,
//! department-specific token derivations, the pre-transmission package
//! digest, the optional schema gate, and agency message-function validation.
//! Every seam fails closed: a failing implementation aborts the exchange
//! before anything reaches the wire.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use url::Url;

use crate::core::message::TransactionId;

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Transport errors for the single HTTP exchange.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or no bytes came back.
    #[error("transport exchange failed: {0}")]
    Exchange(String),
    /// The response bytes are not valid UTF-8 text.
    #[error("transport response is not valid UTF-8")]
    Encoding,
}

/// One-shot message transport.
///
/// Implementations perform a single HTTP POST of the serialized envelope
/// with a `text/xml` content type and return the raw reply body. No retries,
/// no redirects; timeouts are the implementation's responsibility.
pub trait Transport {
    /// Sends the payload and returns the raw response text.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the exchange fails or yields no bytes.
    fn send(&self, endpoint: &Url, payload: &str) -> Result<String, TransportError>;
}

// ============================================================================
// SECTION: Authentication
// ============================================================================

/// Method/value pair embedded under `IDAuthentication.Authentication`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationToken {
    /// Wire value for the `Method` element.
    pub method: String,
    /// Wire value for the `Value` element.
    pub value: String,
}

/// Authentication derivation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Any failure aborts the build; credentials are never partially emitted.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// Alternative authentication was selected but no derivation is injected.
    #[error("alternative authentication requires an injected derivation")]
    MissingDerivation,
    /// The selected method has no implemented derivation.
    #[error("authentication method `{method}` is not implemented")]
    NotImplemented {
        /// Wire name of the unimplemented method.
        method: String,
    },
    /// The injected derivation failed.
    #[error("authentication derivation failed: {0}")]
    Derivation(String),
}

/// Department-specific token derivation, injected by agency crates.
///
/// The generic engine has no universal algorithm for the `alternative`
/// method; each integration supplies its own derivation over the sender id,
/// password, and per-send transaction id.
pub trait AlternativeAuthentication {
    /// Derives the method/value pair for one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationError`] when no token can be derived.
    fn derive(
        &self,
        sender_id: &str,
        password: &str,
        transaction: &TransactionId,
    ) -> Result<AuthenticationToken, AuthenticationError>;
}

// ============================================================================
// SECTION: Package Digest
// ============================================================================

/// Package digest errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum DigestError {
    /// The serialized envelope did not contain what the digest required.
    #[error("package digest failed: {0}")]
    Digest(String),
}

/// Pre-transmission rewrite hook over the fully serialized envelope.
///
/// Runs exactly once, after serialization; its output is what is
/// schema-validated and transmitted, so any integrity mark it splices in
/// covers the final byte-for-byte body content.
pub trait PackageDigest {
    /// Digests the package, returning it unchanged or rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when the rewrite cannot be applied.
    fn digest(&self, package: String) -> Result<String, DigestError>;
}

/// Default digest: returns the package unaltered.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDigest;

impl PackageDigest for IdentityDigest {
    fn digest(&self, package: String) -> Result<String, DigestError> {
        Ok(package)
    }
}

// ============================================================================
// SECTION: Schema Gate
// ============================================================================

/// Schema gate errors.
///
/// # Invariants
/// - `Unreachable` is a hard failure of the exchange, not a skip.
#[derive(Debug, Error)]
pub enum SchemaGateError {
    /// The schema resource could not be fetched.
    #[error("schema location is unreachable: {0}")]
    Unreachable(String),
    /// The document failed the gate's checks.
    #[error("document rejected by schema gate: {0}")]
    Rejected(String),
}

/// Optional validation gate applied to outbound and inbound XML.
///
/// The contract is pass/fail only; how much of the schema an implementation
/// enforces is its own concern.
pub trait SchemaGate {
    /// Checks a document against the additional schema location.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaGateError`] when the schema is unreachable or the
    /// document is rejected.
    fn check(&self, schema: &Url, document: &str) -> Result<(), SchemaGateError>;
}

// ============================================================================
// SECTION: Message Function Validation
// ============================================================================

/// Message-function validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// The function is not valid for the target service.
    #[error("message function `{function}` is not valid for this service")]
    Unsupported {
        /// Rejected function string.
        function: String,
    },
}

/// Agency hook constraining the free-form message function.
pub trait MessageFunctionValidator {
    /// Validates a message function for the target service.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionError`] when the function is not supported.
    fn validate(&self, function: &str) -> Result<(), FunctionError>;
}

/// Default validator: accepts every function.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFunctions;

impl MessageFunctionValidator for AcceptAllFunctions {
    fn validate(&self, _function: &str) -> Result<(), FunctionError> {
        Ok(())
    }
}
