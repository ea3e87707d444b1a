// crates/govtalk-core/src/core/request.rs
// ============================================================================
// Module: GovTalk Envelope Request
// Description: The value object assembled by a caller before each send.
// Purpose: Hold all outbound envelope state explicitly, with no hidden fields.
// Dependencies: crate::core::{body, message, routing}, url
// ============================================================================

//! ## Overview
//! An [`EnvelopeRequest`] carries everything the envelope builder needs apart
//! from credentials and the per-send transaction id. It is a plain value
//! object: the client holds one and the caller mutates it between sends; the
//! builder only reads it. A send is attempted only once the required fields
//! are all present, which [`EnvelopeRequest::missing_fields`] reports without
//! any network activity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use url::Url;

use crate::core::body::MessageBody;
use crate::core::message::AuthenticationMethod;
use crate::core::message::CorrelationId;
use crate::core::message::MessageClass;
use crate::core::message::MessageFunction;
use crate::core::message::MessageQualifier;
use crate::core::message::SenderEmail;
use crate::core::message::Transformation;
use crate::core::routing::ChannelRoutes;
use crate::core::routing::MessageKeys;
use crate::core::routing::TargetOrganisations;

// ============================================================================
// SECTION: Required Fields
// ============================================================================

/// Fields that must be present before a send is attempted.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    /// `Header.MessageDetails.Class`.
    Class,
    /// `Header.MessageDetails.Qualifier`.
    Qualifier,
    /// Authentication method selection.
    AuthenticationMethod,
    /// Message body (may be empty content, but must be set).
    Body,
}

impl RequiredField {
    /// Returns a short label for log entries.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Class => "message class",
            Self::Qualifier => "message qualifier",
            Self::AuthenticationMethod => "authentication method",
            Self::Body => "message body",
        }
    }
}

// ============================================================================
// SECTION: Envelope Request
// ============================================================================

/// Mutable outbound envelope state assembled before each send.
///
/// # Invariants
/// - Mutated only by the owning caller between sends; the engine reads it.
/// - Field values are validated at construction of their types, so any
///   populated request serializes without further checks.
#[derive(Debug, Clone, Default)]
pub struct EnvelopeRequest {
    /// Department-specific message class.
    pub class: Option<MessageClass>,
    /// Message qualifier.
    pub qualifier: Option<MessageQualifier>,
    /// Optional free-form message function.
    pub function: Option<MessageFunction>,
    /// Correlation id; absent on first submission, required on poll/delete.
    pub correlation_id: Option<CorrelationId>,
    /// Requested response transformation, XML by default.
    pub transformation: Transformation,
    /// Gateway test flag, serialized as '0'/'1'.
    pub test_flag: bool,
    /// Selected authentication method.
    pub authentication: Option<AuthenticationMethod>,
    /// Optional sender email address.
    pub sender_email: Option<SenderEmail>,
    /// Ordered message keys.
    pub keys: MessageKeys,
    /// Target organisations.
    pub target_organisations: TargetOrganisations,
    /// Caller-added channel routes; the builder appends the engine route.
    pub channel_routes: ChannelRoutes,
    /// Additional schema location for the XSI hint and optional validation.
    pub schema_location: Option<Url>,
    /// Whether the additional schema is enforced by the schema gate.
    pub schema_validation: bool,
    /// Opaque message body.
    pub body: Option<MessageBody>,
}

impl EnvelopeRequest {
    /// Creates an empty request with XML transformation and a live test flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports the required fields that are still unset.
    ///
    /// Credentials are checked by the client, which owns them; this method
    /// covers the request-held half of the send invariant.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.class.is_none() {
            missing.push(RequiredField::Class);
        }
        if self.qualifier.is_none() {
            missing.push(RequiredField::Qualifier);
        }
        if self.authentication.is_none() {
            missing.push(RequiredField::AuthenticationMethod);
        }
        if self.body.is_none() {
            missing.push(RequiredField::Body);
        }
        missing
    }
}
