// crates/govtalk-core/src/runtime/builder.rs
// ============================================================================
// Module: GovTalk Envelope Builder
// Description: Stateless serialization of an envelope request to XML.
// Purpose: Produce schema-ordered GovTalk v2.0 envelopes or fail locally.
// Dependencies: crate::{core, interfaces}, base64, md-5, time, xmltree
// ============================================================================

//! ## Overview
//! The builder reads an [`EnvelopeRequest`] plus credentials and a per-send
//! transaction id and serializes the outbound envelope. Serialization order
//! is fixed by the envelope schema: version, message details, sender details,
//! GovTalk details (with the engine's trailing self-identifying channel
//! route), then the opaque body. The builder never mutates the request and
//! fails before any output when a required field or the authentication token
//! is missing, so credentials are never partially serialized.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use md5::Digest;
use md5::Md5;
use thiserror::Error;
use time::OffsetDateTime;
use xmltree::Element;
use xmltree::EmitterConfig;
use xmltree::XMLNode;

use crate::core::body::BodyError;
use crate::core::body::parse_fragment;
use crate::core::message::AuthenticationMethod;
use crate::core::message::Credentials;
use crate::core::message::FieldError;
use crate::core::message::TransactionId;
use crate::core::message::Transformation;
use crate::core::request::EnvelopeRequest;
use crate::core::request::RequiredField;
use crate::core::routing::ChannelRoute;
use crate::interfaces::AlternativeAuthentication;
use crate::interfaces::AuthenticationError;
use crate::interfaces::AuthenticationToken;

// ============================================================================
// SECTION: Wire Constants
// ============================================================================

/// GovTalk envelope namespace.
pub const ENVELOPE_NAMESPACE: &str = "http://www.govtalk.gov.uk/CM/envelope";
/// Envelope version emitted in every message.
pub const ENVELOPE_VERSION: &str = "2.0";
/// Base envelope schema listed in the XSI schema-location hint.
pub const ENVELOPE_SCHEMA: &str = "http://www.govtalk.gov.uk/documents/envelope-v2-0.xsd";
/// XML Schema instance namespace for the schema-location attribute.
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// URI of the engine's trailing self-identifying channel route.
pub const ENGINE_ROUTE_URI: &str = "https://crates.io/crates/govtalk-core";
/// Product name of the engine's trailing channel route.
pub const ENGINE_ROUTE_PRODUCT: &str = "govtalk-core";
/// Product version of the engine's trailing channel route.
pub const ENGINE_ROUTE_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// SECTION: Build Errors
// ============================================================================

/// Failures while assembling the outbound envelope.
///
/// # Invariants
/// - Every variant is raised before any network activity.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A required request field is unset.
    #[error("cannot build envelope: {} is not set", .0.as_str())]
    MissingField(RequiredField),
    /// Sender id or password is empty.
    #[error("cannot build envelope: credentials are incomplete")]
    MissingCredentials,
    /// The authentication strategy produced no token.
    #[error(transparent)]
    Authentication(#[from] AuthenticationError),
    /// The message body could not be serialized or embedded.
    #[error(transparent)]
    Body(#[from] BodyError),
    /// The engine's trailing channel route could not be stamped.
    #[error(transparent)]
    Route(#[from] FieldError),
    /// The assembled element tree could not be written.
    #[error("envelope serialization failed: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Envelope Builder
// ============================================================================

/// Serializes an envelope request into GovTalk v2.0 XML.
///
/// The builder is stateless: it reads the request, emits the envelope in
/// schema order, and appends exactly one trailing self-identifying channel
/// route stamped with `stamped_at`.
///
/// # Errors
///
/// Returns [`BuildError`] when a required field is missing, the selected
/// authentication strategy fails to produce a token, or serialization fails.
pub fn build_envelope(
    request: &EnvelopeRequest,
    credentials: &Credentials,
    transaction: &TransactionId,
    alternative: Option<&dyn AlternativeAuthentication>,
    stamped_at: OffsetDateTime,
) -> Result<String, BuildError> {
    let Some(class) = request.class.as_ref() else {
        return Err(BuildError::MissingField(RequiredField::Class));
    };
    let Some(qualifier) = request.qualifier else {
        return Err(BuildError::MissingField(RequiredField::Qualifier));
    };
    if credentials.sender_id().is_empty() || credentials.password().is_empty() {
        return Err(BuildError::MissingCredentials);
    }
    let Some(method) = request.authentication else {
        return Err(BuildError::MissingField(RequiredField::AuthenticationMethod));
    };
    let Some(body) = request.body.as_ref() else {
        return Err(BuildError::MissingField(RequiredField::Body));
    };

    // Token derivation happens before any element is assembled.
    let token = authentication_token(method, credentials, transaction, alternative)?;

    let mut envelope = Element::new("GovTalkMessage");
    let mut schema_location = String::from(ENVELOPE_SCHEMA);
    if let Some(additional) = request.schema_location.as_ref() {
        schema_location.push(' ');
        schema_location.push_str(additional.as_str());
    }
    envelope.attributes.insert("xmlns".to_string(), ENVELOPE_NAMESPACE.to_string());
    envelope.attributes.insert("xmlns:xsi".to_string(), XSI_NAMESPACE.to_string());
    envelope.attributes.insert("xsi:schemaLocation".to_string(), schema_location);

    push_leaf(&mut envelope, "EnvelopeVersion", ENVELOPE_VERSION);

    // Header.
    let mut header = Element::new("Header");
    let mut details = Element::new("MessageDetails");
    push_leaf(&mut details, "Class", class.as_str());
    push_leaf(&mut details, "Qualifier", qualifier.as_str());
    if let Some(function) = request.function.as_ref() {
        push_leaf(&mut details, "Function", function.as_str());
    }
    push_leaf(&mut details, "TransactionID", transaction.as_str());
    if let Some(correlation) = request.correlation_id.as_ref() {
        push_leaf(&mut details, "CorrelationID", correlation.as_str());
    }
    if request.transformation != Transformation::Xml {
        push_leaf(&mut details, "Transformation", request.transformation.as_str());
    }
    push_leaf(&mut details, "GatewayTest", if request.test_flag { "1" } else { "0" });
    push_child(&mut header, details);

    let mut sender = Element::new("SenderDetails");
    let mut id_authentication = Element::new("IDAuthentication");
    push_leaf(&mut id_authentication, "SenderID", credentials.sender_id());
    let mut authentication = Element::new("Authentication");
    push_leaf(&mut authentication, "Method", &token.method);
    push_leaf(&mut authentication, "Value", &token.value);
    push_child(&mut id_authentication, authentication);
    push_child(&mut sender, id_authentication);
    if let Some(email) = request.sender_email.as_ref() {
        push_leaf(&mut sender, "EmailAddress", email.as_str());
    }
    push_child(&mut header, sender);
    push_child(&mut envelope, header);

    // GovTalkDetails.
    let mut govtalk_details = Element::new("GovTalkDetails");
    if !request.keys.is_empty() {
        let mut keys = Element::new("Keys");
        for key in request.keys.entries() {
            let mut entry = Element::new("Key");
            entry.attributes.insert("Type".to_string(), key.key_type().to_string());
            entry.children.push(XMLNode::Text(key.value().to_string()));
            push_child(&mut keys, entry);
        }
        push_child(&mut govtalk_details, keys);
    }
    if !request.target_organisations.is_empty() {
        let mut targets = Element::new("TargetDetails");
        for organisation in request.target_organisations.entries() {
            push_leaf(&mut targets, "Organisation", organisation.as_str());
        }
        push_child(&mut govtalk_details, targets);
    }
    for route in request.channel_routes.entries() {
        push_child(&mut govtalk_details, route_element(route));
    }
    push_child(&mut govtalk_details, route_element(&engine_route(stamped_at)?));
    push_child(&mut envelope, govtalk_details);

    // Body: raw passthrough of the caller-supplied fragment.
    let mut body_element = Element::new("Body");
    let serialized = body.serialize()?;
    if !serialized.is_empty() {
        for node in parse_fragment(&serialized)? {
            body_element.children.push(node);
        }
    }
    push_child(&mut envelope, body_element);

    write_envelope(&envelope)
}

// ============================================================================
// SECTION: Authentication Strategies
// ============================================================================

/// Produces the method/value pair for the selected authentication method.
///
/// # Errors
///
/// Returns [`AuthenticationError`] when the method is unimplemented or the
/// injected derivation is missing or fails.
fn authentication_token(
    method: AuthenticationMethod,
    credentials: &Credentials,
    transaction: &TransactionId,
    alternative: Option<&dyn AlternativeAuthentication>,
) -> Result<AuthenticationToken, AuthenticationError> {
    match method {
        AuthenticationMethod::Clear => Ok(AuthenticationToken {
            method: "clear".to_string(),
            value: credentials.password().to_string(),
        }),
        AuthenticationMethod::Md5 => {
            let digest = Md5::digest(credentials.password().to_ascii_lowercase().as_bytes());
            Ok(AuthenticationToken {
                method: "MD5".to_string(),
                value: BASE64.encode(digest),
            })
        }
        AuthenticationMethod::Alternative => alternative
            .ok_or(AuthenticationError::MissingDerivation)?
            .derive(credentials.sender_id(), credentials.password(), transaction),
        AuthenticationMethod::W3cSigned => Err(AuthenticationError::NotImplemented {
            method: "W3Csigned".to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the engine's trailing self-identifying channel route.
fn engine_route(stamped_at: OffsetDateTime) -> Result<ChannelRoute, FieldError> {
    ChannelRoute::new(
        ENGINE_ROUTE_URI,
        Some(ENGINE_ROUTE_PRODUCT.to_string()),
        Some(ENGINE_ROUTE_VERSION.to_string()),
        Vec::new(),
        stamped_at,
    )
}

/// Renders one `ChannelRouting` element.
fn route_element(route: &ChannelRoute) -> Element {
    let mut routing = Element::new("ChannelRouting");
    let mut channel = Element::new("Channel");
    push_leaf(&mut channel, "URI", route.uri());
    if let Some(product) = route.product() {
        push_leaf(&mut channel, "Product", product);
    }
    if let Some(version) = route.version() {
        push_leaf(&mut channel, "Version", version);
    }
    push_child(&mut routing, channel);
    for id in route.ids() {
        let mut entry = Element::new("ID");
        entry.attributes.insert("type".to_string(), id.id_type.clone());
        entry.children.push(XMLNode::Text(id.value.clone()));
        push_child(&mut routing, entry);
    }
    push_leaf(&mut routing, "Timestamp", route.timestamp());
    routing
}

/// Appends a child element.
fn push_child(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

/// Appends a leaf element with text content.
fn push_leaf(parent: &mut Element, name: &str, text: &str) {
    let mut leaf = Element::new(name);
    leaf.children.push(XMLNode::Text(text.to_string()));
    push_child(parent, leaf);
}

/// Writes the envelope with indentation and no XML declaration.
fn write_envelope(envelope: &Element) -> Result<String, BuildError> {
    let config = EmitterConfig::new()
        .perform_indent(true)
        .write_document_declaration(false);
    let mut buffer = Vec::new();
    envelope
        .write_with_config(&mut buffer, config)
        .map_err(|error| BuildError::Serialize(error.to_string()))?;
    String::from_utf8(buffer).map_err(|error| BuildError::Serialize(error.to_string()))
}
