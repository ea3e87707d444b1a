// crates/govtalk-core/src/runtime/parser.rs
// ============================================================================
// Module: GovTalk Response Parser
// Description: Inbound envelope extraction and gateway error classification.
// Purpose: Build the read-only response model from a raw reply document.
// Dependencies: crate::core, thiserror, xmltree
// ============================================================================

//! ## Overview
//! The parser extracts only the data the response model carries: qualifier,
//! correlation id, gateway timestamp, poll endpoint, classified errors, and
//! the raw body content. It is a pure function over the reply text; the
//! client decides whether to invoke it at all (non-XML transformations are a
//! documented no-op).

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use xmltree::Element;
use xmltree::XMLNode;

use crate::core::body::BodyError;
use crate::core::body::write_element;
use crate::core::message::CorrelationId;
use crate::core::message::FieldError;
use crate::core::message::MessageQualifier;
use crate::core::response::EnvelopeResponse;
use crate::core::response::GovTalkErrorDetail;
use crate::core::response::ResponseEndpoint;
use crate::core::response::ResponseErrors;

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Failures while interpreting a reply envelope.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The reply is not well-formed XML.
    #[error("response is not well-formed XML: {0}")]
    Malformed(String),
    /// A structurally required element is absent.
    #[error("response envelope is missing `{element}`")]
    MissingElement {
        /// Name of the absent element.
        element: &'static str,
    },
    /// An extracted field value failed validation.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// The body content could not be re-serialized.
    #[error(transparent)]
    Body(#[from] BodyError),
}

// ============================================================================
// SECTION: Response Parser
// ============================================================================

/// Parses a reply envelope into the response model.
///
/// # Errors
///
/// Returns [`ParseError`] when the document is malformed, the header is
/// structurally incomplete, or an extracted field fails validation.
pub fn parse_envelope(raw: &str) -> Result<EnvelopeResponse, ParseError> {
    let root = Element::parse(raw.as_bytes())
        .map_err(|error| ParseError::Malformed(error.to_string()))?;

    let header = root.get_child("Header").ok_or(ParseError::MissingElement {
        element: "Header",
    })?;
    let details = header.get_child("MessageDetails").ok_or(ParseError::MissingElement {
        element: "MessageDetails",
    })?;

    let qualifier_text = child_text(details, "Qualifier").ok_or(ParseError::MissingElement {
        element: "Qualifier",
    })?;
    let qualifier = MessageQualifier::parse(&qualifier_text)?;

    let correlation_id = match child_text(details, "CorrelationID") {
        Some(text) if !text.is_empty() => Some(CorrelationId::new(text)?),
        _ => None,
    };

    let gateway_timestamp =
        child_text(details, "GatewayTimestamp").filter(|text| !text.is_empty());

    let response_endpoint = details.get_child("ResponseEndPoint").map(|endpoint| {
        ResponseEndpoint {
            endpoint: element_text(endpoint),
            poll_interval: endpoint
                .attributes
                .get("PollInterval")
                .and_then(|interval| interval.parse().ok()),
        }
    });

    let errors = classify_errors(&root);

    let body = match root.get_child("Body") {
        Some(body_element) => inner_xml(body_element)?,
        None => String::new(),
    };

    Ok(EnvelopeResponse {
        qualifier,
        correlation_id,
        gateway_timestamp,
        response_endpoint,
        errors,
        body,
    })
}

// ============================================================================
// SECTION: Error Classification
// ============================================================================

/// Classifies `GovTalkDetails.GovTalkErrors` entries by literal type.
///
/// Unknown type strings become their own bucket; the classifier never
/// rejects an entry. A missing `Location` or an empty one is dropped.
fn classify_errors(root: &Element) -> ResponseErrors {
    let mut errors = ResponseErrors::new();
    let Some(error_list) =
        root.get_child("GovTalkDetails").and_then(|details| details.get_child("GovTalkErrors"))
    else {
        return errors;
    };
    for node in &error_list.children {
        let XMLNode::Element(entry) = node else {
            continue;
        };
        if entry.name != "Error" {
            continue;
        }
        let error_type = child_text(entry, "Type").unwrap_or_default();
        let detail = GovTalkErrorDetail {
            number: child_text(entry, "Number").unwrap_or_default(),
            text: child_text(entry, "Text").unwrap_or_default(),
            location: child_text(entry, "Location").filter(|location| !location.is_empty()),
        };
        errors.classify(error_type, detail);
    }
    errors
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the text content of a named child, when the child exists.
fn child_text(parent: &Element, name: &str) -> Option<String> {
    parent.get_child(name).map(element_text)
}

/// Returns the concatenated text content of an element.
fn element_text(element: &Element) -> String {
    element.get_text().map(|text| text.into_owned()).unwrap_or_default()
}

/// Re-serializes an element's children as inner XML.
fn inner_xml(element: &Element) -> Result<String, BodyError> {
    let mut inner = String::new();
    for node in &element.children {
        match node {
            XMLNode::Element(child) => inner.push_str(&write_element(child)?),
            XMLNode::Text(text) => inner.push_str(text),
            _ => {}
        }
    }
    Ok(inner.trim().to_string())
}
