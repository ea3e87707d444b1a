// crates/govtalk-core/tests/envelope_build.rs
// ============================================================================
// Module: Envelope Builder Tests
// Description: Required-field invariant, authentication values, structure.
// ============================================================================
//! ## Overview
//! Builds envelopes and parses them back to verify schema ordering, the
//! authentication scenarios, and the trailing self-identifying route.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use govtalk_core::AlternativeAuthentication;
use govtalk_core::AuthenticationError;
use govtalk_core::AuthenticationMethod;
use govtalk_core::AuthenticationToken;
use govtalk_core::BuildError;
use govtalk_core::ChannelRoute;
use govtalk_core::CorrelationId;
use govtalk_core::Credentials;
use govtalk_core::EnvelopeRequest;
use govtalk_core::MessageBody;
use govtalk_core::MessageClass;
use govtalk_core::MessageKey;
use govtalk_core::MessageQualifier;
use govtalk_core::TargetOrganisation;
use govtalk_core::TransactionId;
use govtalk_core::build_envelope;
use govtalk_core::runtime::ENGINE_ROUTE_PRODUCT;
use time::macros::datetime;
use xmltree::Element;
use xmltree::XMLNode;

fn sample_request() -> EnvelopeRequest {
    let mut request = EnvelopeRequest::new();
    request.class = Some(MessageClass::new("HMRC-VAT-DEC").expect("class"));
    request.qualifier = Some(MessageQualifier::Request);
    request.authentication = Some(AuthenticationMethod::Clear);
    request.body = Some(MessageBody::RawText("<Test>payload</Test>".to_string()));
    request
}

fn sample_credentials() -> Credentials {
    Credentials::new("SENDER01", "secret")
}

fn transaction() -> TransactionId {
    TransactionId::new("17534017891234567").expect("transaction")
}

fn build(request: &EnvelopeRequest, credentials: &Credentials) -> Result<String, BuildError> {
    build_envelope(
        request,
        credentials,
        &transaction(),
        None,
        datetime!(2012-01-18 09:30:00 UTC),
    )
}

fn parse(xml: &str) -> Element {
    Element::parse(xml.as_bytes()).expect("well-formed envelope")
}

fn child<'a>(element: &'a Element, name: &str) -> &'a Element {
    element.get_child(name).unwrap_or_else(|| panic!("missing element {name}"))
}

fn text(element: &Element, name: &str) -> String {
    child(element, name).get_text().map(|text| text.into_owned()).unwrap_or_default()
}

#[test]
fn missing_required_fields_fail_without_output() {
    let credentials = sample_credentials();
    for strip in ["class", "qualifier", "authentication", "body"] {
        let mut request = sample_request();
        match strip {
            "class" => request.class = None,
            "qualifier" => request.qualifier = None,
            "authentication" => request.authentication = None,
            _ => request.body = None,
        }
        assert!(
            matches!(build(&request, &credentials), Err(BuildError::MissingField(_))),
            "expected missing-field failure when {strip} is unset"
        );
    }
}

#[test]
fn missing_fields_are_reported_in_declaration_order() {
    let request = EnvelopeRequest::new();
    let missing = request.missing_fields();
    assert_eq!(
        missing,
        vec![
            govtalk_core::RequiredField::Class,
            govtalk_core::RequiredField::Qualifier,
            govtalk_core::RequiredField::AuthenticationMethod,
            govtalk_core::RequiredField::Body,
        ]
    );
    assert!(sample_request().missing_fields().is_empty());
}

#[test]
fn empty_credentials_fail_the_build() {
    let request = sample_request();
    assert!(matches!(
        build(&request, &Credentials::new("", "secret")),
        Err(BuildError::MissingCredentials)
    ));
    assert!(matches!(
        build(&request, &Credentials::new("SENDER01", "")),
        Err(BuildError::MissingCredentials)
    ));
}

#[test]
fn clear_authentication_embeds_the_password() {
    let envelope = parse(&build(&sample_request(), &sample_credentials()).expect("build"));
    let header = child(&envelope, "Header");
    let authentication =
        child(child(child(header, "SenderDetails"), "IDAuthentication"), "Authentication");
    assert_eq!(text(authentication, "Method"), "clear");
    assert_eq!(text(authentication, "Value"), "secret");
}

#[test]
fn md5_authentication_encodes_the_lowercased_password() {
    let mut request = sample_request();
    request.authentication = Some(AuthenticationMethod::Md5);
    let envelope = parse(&build(&request, &sample_credentials()).expect("build"));
    let header = child(&envelope, "Header");
    let authentication =
        child(child(child(header, "SenderDetails"), "IDAuthentication"), "Authentication");
    assert_eq!(text(authentication, "Method"), "MD5");
    // base64 of the raw MD5 digest of "secret".
    assert_eq!(text(authentication, "Value"), "Xr4ilOzQ4PCOq3aQ0qbuaQ==");

    let envelope_upper =
        parse(&build(&request, &Credentials::new("SENDER01", "SECRET")).expect("build"));
    let header_upper = child(&envelope_upper, "Header");
    let authentication_upper =
        child(child(child(header_upper, "SenderDetails"), "IDAuthentication"), "Authentication");
    assert_eq!(text(authentication_upper, "Value"), "Xr4ilOzQ4PCOq3aQ0qbuaQ==");
}

#[test]
fn alternative_authentication_requires_a_derivation() {
    let mut request = sample_request();
    request.authentication = Some(AuthenticationMethod::Alternative);
    assert!(matches!(
        build(&request, &sample_credentials()),
        Err(BuildError::Authentication(AuthenticationError::MissingDerivation))
    ));
}

struct FixedToken;

impl AlternativeAuthentication for FixedToken {
    fn derive(
        &self,
        sender_id: &str,
        _password: &str,
        transaction: &TransactionId,
    ) -> Result<AuthenticationToken, AuthenticationError> {
        Ok(AuthenticationToken {
            method: "TESTMD5".to_string(),
            value: format!("{sender_id}:{transaction}"),
        })
    }
}

#[test]
fn alternative_authentication_uses_the_injected_derivation() {
    let mut request = sample_request();
    request.authentication = Some(AuthenticationMethod::Alternative);
    let xml = build_envelope(
        &request,
        &sample_credentials(),
        &transaction(),
        Some(&FixedToken),
        datetime!(2012-01-18 09:30:00 UTC),
    )
    .expect("build");
    let envelope = parse(&xml);
    let header = child(&envelope, "Header");
    let authentication =
        child(child(child(header, "SenderDetails"), "IDAuthentication"), "Authentication");
    assert_eq!(text(authentication, "Method"), "TESTMD5");
    assert_eq!(text(authentication, "Value"), "SENDER01:17534017891234567");
}

#[test]
fn w3csigned_fails_cleanly() {
    let mut request = sample_request();
    request.authentication = Some(AuthenticationMethod::W3cSigned);
    assert!(matches!(
        build(&request, &sample_credentials()),
        Err(BuildError::Authentication(AuthenticationError::NotImplemented { .. }))
    ));
}

#[test]
fn message_details_follow_schema_order_and_values() {
    let mut request = sample_request();
    request.correlation_id = Some(CorrelationId::new("1B2F3D4C").expect("correlation"));
    request.test_flag = true;
    let envelope = parse(&build(&request, &sample_credentials()).expect("build"));

    assert_eq!(text(&envelope, "EnvelopeVersion"), "2.0");
    let details = child(child(&envelope, "Header"), "MessageDetails");
    assert_eq!(text(details, "Class"), "HMRC-VAT-DEC");
    assert_eq!(text(details, "Qualifier"), "request");
    assert_eq!(text(details, "TransactionID"), "17534017891234567");
    assert_eq!(text(details, "CorrelationID"), "1B2F3D4C");
    assert_eq!(text(details, "GatewayTest"), "1");
    // XML transformation is the default and is omitted on the wire.
    assert!(details.get_child("Transformation").is_none());
}

#[test]
fn keys_and_targets_are_emitted_under_govtalk_details() {
    let mut request = sample_request();
    request.keys.add(MessageKey::new("VATRegNo", "999900001").expect("key"));
    request.target_organisations.add(TargetOrganisation::new("HMRC").expect("target"), false);
    let envelope = parse(&build(&request, &sample_credentials()).expect("build"));

    let details = child(&envelope, "GovTalkDetails");
    let key = child(child(details, "Keys"), "Key");
    assert_eq!(key.attributes.get("Type").map(String::as_str), Some("VATRegNo"));
    assert_eq!(key.get_text().map(|text| text.into_owned()), Some("999900001".to_string()));
    assert_eq!(text(child(details, "TargetDetails"), "Organisation"), "HMRC");
}

#[test]
fn engine_route_is_always_last_and_appears_exactly_once() {
    let mut request = sample_request();
    request
        .channel_routes
        .add(
            ChannelRoute::new(
                "https://example.org/app",
                Some("tax-filer".to_string()),
                Some("1.0".to_string()),
                Vec::new(),
                datetime!(2012-01-18 09:00:00 UTC),
            )
            .expect("route"),
            false,
        );
    let envelope = parse(&build(&request, &sample_credentials()).expect("build"));

    let details = child(&envelope, "GovTalkDetails");
    let routes: Vec<&Element> = details
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(element) if element.name == "ChannelRouting" => Some(element),
            _ => None,
        })
        .collect();
    assert_eq!(routes.len(), 2);

    let products: Vec<String> =
        routes.iter().map(|route| text(child(route, "Channel"), "Product")).collect();
    assert_eq!(products.first().map(String::as_str), Some("tax-filer"));
    assert_eq!(products.last().map(String::as_str), Some(ENGINE_ROUTE_PRODUCT));
    assert_eq!(
        products.iter().filter(|product| product.as_str() == ENGINE_ROUTE_PRODUCT).count(),
        1
    );
}

#[test]
fn body_content_is_embedded_verbatim() {
    let envelope = parse(&build(&sample_request(), &sample_credentials()).expect("build"));
    let body = child(&envelope, "Body");
    assert_eq!(text(body, "Test"), "payload");
}

#[test]
fn empty_body_is_allowed_for_generic_requests() {
    let mut request = sample_request();
    request.body = Some(MessageBody::empty());
    let envelope = parse(&build(&request, &sample_credentials()).expect("build"));
    let body = child(&envelope, "Body");
    assert!(body.children.iter().all(|node| !matches!(node, XMLNode::Element(_))));
}

#[test]
fn schema_location_hint_lists_base_and_additional_schema() {
    let mut request = sample_request();
    request.schema_location =
        Some(url::Url::parse("http://www.govtalk.gov.uk/taxation/vat/vatdeclaration/2/VATDeclarationRequest-v2-1.xsd").expect("url"));
    let envelope = parse(&build(&request, &sample_credentials()).expect("build"));
    // The parser tracks the xsi prefix separately, so the key is local.
    let hint = envelope.attributes.get("schemaLocation").expect("schema location");
    assert!(hint.starts_with("http://www.govtalk.gov.uk/documents/envelope-v2-0.xsd"));
    assert!(hint.ends_with("VATDeclarationRequest-v2-1.xsd"));
}
