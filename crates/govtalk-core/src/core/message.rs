// crates/govtalk-core/src/core/message.rs
// ============================================================================
// Module: GovTalk Message Fields
// Description: Validated value types for GovTalk envelope header fields.
// Purpose: Enforce envelope-v2.0 field invariants at construction boundaries.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the validated field types carried in the
//! `Header.MessageDetails` and `Header.SenderDetails` sections of a GovTalk
//! envelope. Every type enforces its wire-format invariant in its constructor
//! so a populated [`crate::core::request::EnvelopeRequest`] is always
//! serializable without further checks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Field Errors
// ============================================================================

/// Local validation failures for envelope fields.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Every variant is raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Message class length is outside the exclusive bounds.
    #[error("message class length {length} is outside the exclusive 4..32 bounds")]
    ClassLength {
        /// Rejected length, in characters.
        length: usize,
    },
    /// Message qualifier string is not one of the defined qualifiers.
    #[error("message qualifier `{value}` is not recognised")]
    QualifierUnknown {
        /// Rejected qualifier string.
        value: String,
    },
    /// Transformation string is not one of the defined transformations.
    #[error("message transformation `{value}` is not recognised")]
    TransformationUnknown {
        /// Rejected transformation string.
        value: String,
    },
    /// Authentication method string is not one of the defined methods.
    #[error("authentication method `{value}` is not recognised")]
    AuthenticationMethodUnknown {
        /// Rejected method string.
        value: String,
    },
    /// Transaction id contains non-digit characters or is empty.
    #[error("transaction id must be a non-empty numeric string")]
    TransactionNotNumeric,
    /// Correlation id does not match `[0-9A-F]{0,32}`.
    #[error("correlation id must match [0-9A-F]{{0,32}}")]
    CorrelationFormat,
    /// Sender email address is not in the envelope local-part@domain form.
    #[error("sender email address is not in local-part@domain form")]
    EmailFormat,
    /// Message key type or value is empty.
    #[error("message key type and value must be non-empty")]
    KeyEmpty,
    /// Target organisation is empty or too long.
    #[error("target organisation must be non-empty and shorter than 65 characters")]
    TargetOrganisationLength,
    /// Channel route URI is empty.
    #[error("channel route uri must be non-empty")]
    RouteUriEmpty,
    /// Channel route timestamp cannot be rendered as RFC 3339.
    #[error("channel route timestamp cannot be rendered as RFC 3339")]
    RouteTimestamp,
}

// ============================================================================
// SECTION: Message Details Fields
// ============================================================================

/// Department-specific message class (`Header.MessageDetails.Class`).
///
/// # Invariants
/// - Length is strictly between 4 and 32 characters (exclusive bounds).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageClass(String);

impl MessageClass {
    /// Creates a message class after checking the exclusive length bounds.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ClassLength`] when the length is 4 or fewer, or
    /// 32 or more, characters.
    pub fn new(class: impl Into<String>) -> Result<Self, FieldError> {
        let class = class.into();
        let length = class.chars().count();
        if length > 4 && length < 32 {
            Ok(Self(class))
        } else {
            Err(FieldError::ClassLength {
                length,
            })
        }
    }

    /// Returns the class as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Envelope message qualifier (`Header.MessageDetails.Qualifier`).
///
/// # Invariants
/// - Wire form is always lowercase; parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageQualifier {
    /// New submission or generic request.
    Request,
    /// Gateway acknowledgement carrying a poll endpoint.
    Acknowledgement,
    /// Terminal gateway response carrying domain data.
    Response,
    /// Poll for a previously acknowledged submission.
    Poll,
    /// Gateway-reported error envelope.
    Error,
}

impl MessageQualifier {
    /// Parses a qualifier from its wire form, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::QualifierUnknown`] for any other value.
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        match value.to_ascii_lowercase().as_str() {
            "request" => Ok(Self::Request),
            "acknowledgement" => Ok(Self::Acknowledgement),
            "response" => Ok(Self::Response),
            "poll" => Ok(Self::Poll),
            "error" => Ok(Self::Error),
            _ => Err(FieldError::QualifierUnknown {
                value: value.to_string(),
            }),
        }
    }

    /// Returns the lowercase wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Acknowledgement => "acknowledgement",
            Self::Response => "response",
            Self::Poll => "poll",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for MessageQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope message function (`Header.MessageDetails.Function`).
///
/// # Invariants
/// - Free-form; not validated beyond presence. Agency crates may constrain it
///   through [`crate::interfaces::MessageFunctionValidator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageFunction(String);

impl MessageFunction {
    /// Function used for submissions.
    pub const SUBMIT: &'static str = "submit";
    /// Function used for status-report list requests.
    pub const LIST: &'static str = "list";
    /// Function used for correlation delete requests.
    pub const DELETE: &'static str = "delete";

    /// Creates a message function.
    #[must_use]
    pub fn new(function: impl Into<String>) -> Self {
        Self(function.into())
    }

    /// Returns the function as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Client-generated transaction identifier (`Header.MessageDetails.TransactionID`).
///
/// # Invariants
/// - Purely numeric and non-empty. Some gateways reject the wider hex form
///   the envelope schema permits, so only numeric ids are produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    /// Creates a transaction id after checking the numeric invariant.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TransactionNotNumeric`] when the value is empty
    /// or contains a non-digit character.
    pub fn new(id: impl Into<String>) -> Result<Self, FieldError> {
        let id = id.into();
        if !id.is_empty() && id.bytes().all(|byte| byte.is_ascii_digit()) {
            Ok(Self(id))
        } else {
            Err(FieldError::TransactionNotNumeric)
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps digits produced by the clock-based generator.
    ///
    /// Callers must pass digit-only content; this skips the public check.
    pub(crate) fn from_clock_digits(digits: String) -> Self {
        Self(digits)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Gateway-issued correlation identifier (`Header.MessageDetails.CorrelationID`).
///
/// # Invariants
/// - Matches `[0-9A-F]{0,32}` in full: uppercase hex, at most 32 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Creates a correlation id after checking the hex format.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::CorrelationFormat`] when the value is longer
    /// than 32 characters or contains anything other than `0-9A-F`.
    pub fn new(id: impl Into<String>) -> Result<Self, FieldError> {
        let id = id.into();
        let valid = id.len() <= 32
            && id.bytes().all(|byte| byte.is_ascii_digit() || (b'A'..=b'F').contains(&byte));
        if valid {
            Ok(Self(id))
        } else {
            Err(FieldError::CorrelationFormat)
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true when the id carries no characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Requested response transformation (`Header.MessageDetails.Transformation`).
///
/// # Invariants
/// - Only [`Transformation::Xml`] responses are interpreted by the parser;
///   the other transformations are accepted configuration with no parse step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transformation {
    /// Standard XML reply (default).
    #[default]
    Xml,
    /// HTML reply; accepted but never parsed.
    Html,
    /// Plain-text reply; accepted but never parsed.
    Text,
}

impl Transformation {
    /// Parses a transformation from its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TransformationUnknown`] for any other value.
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        match value {
            "XML" => Ok(Self::Xml),
            "HTML" => Ok(Self::Html),
            "text" => Ok(Self::Text),
            _ => Err(FieldError::TransformationUnknown {
                value: value.to_string(),
            }),
        }
    }

    /// Returns the wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xml => "XML",
            Self::Html => "HTML",
            Self::Text => "text",
        }
    }
}

// ============================================================================
// SECTION: Sender Details Fields
// ============================================================================

/// Selected authentication method (`IDAuthentication.Authentication.Method`).
///
/// # Invariants
/// - Wire spellings are fixed by the envelope schema and preserved exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationMethod {
    /// Plaintext password.
    Clear,
    /// Department-specific derived token supplied by an injected strategy.
    Alternative,
    /// Base64 of the raw MD5 digest of the lowercased password.
    Md5,
    /// W3C signature; not implemented, fails cleanly at build time.
    W3cSigned,
}

impl AuthenticationMethod {
    /// Parses an authentication method from its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::AuthenticationMethodUnknown`] for any other value.
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        match value {
            "clear" => Ok(Self::Clear),
            "alternative" => Ok(Self::Alternative),
            "MD5" => Ok(Self::Md5),
            "W3Csigned" => Ok(Self::W3cSigned),
            _ => Err(FieldError::AuthenticationMethodUnknown {
                value: value.to_string(),
            }),
        }
    }

    /// Returns the wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Alternative => "alternative",
            Self::Md5 => "MD5",
            Self::W3cSigned => "W3Csigned",
        }
    }
}

/// Sender email address (`SenderDetails.EmailAddress`).
///
/// # Invariants
/// - Matches the envelope-v2.0 pattern: 1-64 characters of `[A-Za-z0-9._-]`
///   on each side of a single `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SenderEmail(String);

impl SenderEmail {
    /// Creates a sender email after checking the envelope pattern.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmailFormat`] when the address does not match.
    pub fn new(address: impl Into<String>) -> Result<Self, FieldError> {
        let address = address.into();
        if is_envelope_email(&address) {
            Ok(Self(address))
        } else {
            Err(FieldError::EmailFormat)
        }
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SenderEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Gateway credentials, immutable for the lifetime of a client.
///
/// # Invariants
/// - Never serialized; the password only leaves this type through the
///   authentication value emitted by the envelope builder.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Gateway sender id (`IDAuthentication.SenderID`).
    sender_id: String,
    /// Gateway password consumed by the authentication strategies.
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(sender_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            password: password.into(),
        }
    }

    /// Returns the sender id.
    #[must_use]
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Returns the password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("sender_id", &self.sender_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when a byte belongs to the envelope email character class.
const fn is_email_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_')
}

/// Checks the envelope-v2.0 email pattern in full.
fn is_envelope_email(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    let side_ok = |side: &str| {
        !side.is_empty() && side.len() <= 64 && side.bytes().all(is_email_byte)
    };
    side_ok(local) && side_ok(domain)
}
