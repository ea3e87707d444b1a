// crates/govtalk-core/src/core/response.rs
// ============================================================================
// Module: GovTalk Envelope Response
// Description: Parsed inbound envelope model and classified gateway errors.
// Purpose: Expose read-only response data with stable error buckets.
// Dependencies: crate::core::{body, message}, serde, xmltree
// ============================================================================

//! ## Overview
//! An [`EnvelopeResponse`] is derived wholesale from the last successfully
//! parsed reply and never merged with a prior response. Gateway-reported
//! errors live in classified buckets keyed by the literal `Type` string;
//! the four defined buckets are fatal, recoverable, business, and warning,
//! but unknown types are still stored under their own literal key rather
//! than rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use xmltree::Element;
use xmltree::XMLNode;

use crate::core::body::BodyError;
use crate::core::body::parse_fragment;
use crate::core::message::CorrelationId;
use crate::core::message::MessageQualifier;

// ============================================================================
// SECTION: Error Buckets
// ============================================================================

/// Bucket key for fatal gateway errors.
pub const ERROR_TYPE_FATAL: &str = "fatal";
/// Bucket key for recoverable gateway errors.
pub const ERROR_TYPE_RECOVERABLE: &str = "recoverable";
/// Bucket key for business-rule gateway errors.
pub const ERROR_TYPE_BUSINESS: &str = "business";
/// Bucket key for gateway warnings.
pub const ERROR_TYPE_WARNING: &str = "warning";

/// One error entry from `GovTalkDetails.GovTalkErrors`.
///
/// # Invariants
/// - `location` is present only when the gateway sent a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovTalkErrorDetail {
    /// Gateway error number.
    pub number: String,
    /// Free-text error description.
    pub text: String,
    /// Optional location of the offending content.
    pub location: Option<String>,
}

/// Gateway errors classified by their literal `Type` string.
///
/// # Invariants
/// - Bucket keys are the literal type strings; unknown types are stored, not
///   rejected.
/// - Entry order within a bucket follows document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseErrors {
    /// Classified error entries keyed by literal type.
    buckets: BTreeMap<String, Vec<GovTalkErrorDetail>>,
}

impl ResponseErrors {
    /// Creates an empty classification.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// Files an error entry under its literal type.
    pub fn classify(&mut self, error_type: impl Into<String>, detail: GovTalkErrorDetail) {
        self.buckets.entry(error_type.into()).or_default().push(detail);
    }

    /// Returns the entries stored under one literal type.
    #[must_use]
    pub fn bucket(&self, error_type: &str) -> &[GovTalkErrorDetail] {
        self.buckets.get(error_type).map_or(&[], Vec::as_slice)
    }

    /// Returns the fatal bucket.
    #[must_use]
    pub fn fatal(&self) -> &[GovTalkErrorDetail] {
        self.bucket(ERROR_TYPE_FATAL)
    }

    /// Returns the recoverable bucket.
    #[must_use]
    pub fn recoverable(&self) -> &[GovTalkErrorDetail] {
        self.bucket(ERROR_TYPE_RECOVERABLE)
    }

    /// Returns the business bucket.
    #[must_use]
    pub fn business(&self) -> &[GovTalkErrorDetail] {
        self.bucket(ERROR_TYPE_BUSINESS)
    }

    /// Returns the warning bucket.
    #[must_use]
    pub fn warning(&self) -> &[GovTalkErrorDetail] {
        self.bucket(ERROR_TYPE_WARNING)
    }

    /// Returns the populated literal types in sorted order.
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        self.buckets.keys().map(String::as_str).collect()
    }

    /// Returns the number of classified entries across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Returns true when no entries are classified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

// ============================================================================
// SECTION: Response Endpoint
// ============================================================================

/// Poll endpoint advertised by an acknowledgement response.
///
/// # Invariants
/// - `poll_interval` is the gateway-recommended wait in seconds, when given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEndpoint {
    /// Gateway URL to poll for the delayed result.
    pub endpoint: String,
    /// Recommended seconds to wait before polling.
    pub poll_interval: Option<u64>,
}

// ============================================================================
// SECTION: Envelope Response
// ============================================================================

/// Read-only model of the last parsed inbound envelope.
///
/// # Invariants
/// - Replaced wholesale on every send; never merged with a prior response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeResponse {
    /// Response qualifier.
    pub qualifier: MessageQualifier,
    /// Gateway-issued correlation id, when present.
    pub correlation_id: Option<CorrelationId>,
    /// Gateway timestamp text, as received.
    pub gateway_timestamp: Option<String>,
    /// Poll endpoint, present on acknowledgements.
    pub response_endpoint: Option<ResponseEndpoint>,
    /// Classified gateway errors; empty when the exchange carried none.
    pub errors: ResponseErrors,
    /// Inner XML of the `Body` element, as received.
    pub body: String,
}

impl EnvelopeResponse {
    /// Returns true when the gateway reported any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Parses the body content and returns its first element, if any.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::NotWellFormed`] when the body content is not
    /// well-formed XML.
    pub fn body_element(&self) -> Result<Option<Element>, BodyError> {
        let nodes = parse_fragment(&self.body)?;
        Ok(nodes.into_iter().find_map(|node| match node {
            XMLNode::Element(element) => Some(element),
            _ => None,
        }))
    }
}
