// crates/govtalk-transport/tests/http_exchange.rs
// ============================================================================
// Module: HTTP Exchange Tests
// Description: Loopback-gateway tests for the blocking transport and gate.
// ============================================================================
//! ## Overview
//! Runs a tiny_http loopback gateway and verifies the POST shape, size
//! limits, scheme policy, schema gate reachability, and a full client
//! exchange over the real transport.

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

use std::thread;

use govtalk_core::Credentials;
use govtalk_core::GovTalkClient;
use govtalk_core::MessageBody;
use govtalk_core::SchemaGate;
use govtalk_core::SchemaGateError;
use govtalk_core::SendOutcome;
use govtalk_core::Transport;
use govtalk_core::TransportError;
use govtalk_transport::HttpTransport;
use govtalk_transport::HttpTransportConfig;
use govtalk_transport::ReachabilitySchemaGate;
use govtalk_transport::SchemaGateConfig;
use url::Url;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// One recorded loopback request.
struct RecordedRequest {
    method: String,
    content_type: Option<String>,
    body: String,
}

/// Serves exactly one request on a loopback port, replying with `reply`.
fn one_shot_server(reply: &'static str, status: u16) -> (Url, thread::JoinHandle<RecordedRequest>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind loopback");
    let port = server.server_addr().to_ip().expect("ip addr").port();
    let url = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("url");
    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request");
        let method = request.method().to_string();
        let content_type = request
            .headers()
            .iter()
            .find(|header| header.field.equiv("Content-Type"))
            .map(|header| header.value.to_string());
        let mut body = String::new();
        request.as_reader().read_to_string(&mut body).expect("request body");
        let response = tiny_http::Response::from_string(reply)
            .with_status_code(tiny_http::StatusCode(status));
        request.respond(response).expect("respond");
        RecordedRequest {
            method,
            content_type,
            body,
        }
    });
    (url, handle)
}

fn loopback_transport() -> HttpTransport {
    HttpTransport::new(HttpTransportConfig {
        allow_http: true,
        ..HttpTransportConfig::default()
    })
    .expect("transport")
}

fn acknowledgement_reply() -> &'static str {
    "<GovTalkMessage xmlns=\"http://www.govtalk.gov.uk/CM/envelope\">\
     <EnvelopeVersion>2.0</EnvelopeVersion>\
     <Header><MessageDetails>\
     <Class>HMRC-VAT-DEC</Class>\
     <Qualifier>acknowledgement</Qualifier>\
     <TransactionID>17534017891234567</TransactionID>\
     <CorrelationID>1B2F3D4C5E6A7081</CorrelationID>\
     <ResponseEndPoint PollInterval=\"10\">https://poll.gateway.test/submission</ResponseEndPoint>\
     </MessageDetails><SenderDetails/></Header>\
     <GovTalkDetails/><Body/></GovTalkMessage>"
}

// ============================================================================
// SECTION: Transport Behavior
// ============================================================================

#[test]
fn posts_text_xml_and_returns_the_reply() {
    let (url, handle) = one_shot_server("<Reply/>", 200);
    let transport = loopback_transport();

    let reply = transport.send(&url, "<Request/>").expect("exchange");
    assert_eq!(reply, "<Reply/>");

    let recorded = handle.join().expect("server thread");
    assert_eq!(recorded.method, "POST");
    assert_eq!(recorded.content_type.as_deref(), Some("text/xml; charset=utf-8"));
    assert_eq!(recorded.body, "<Request/>");
}

#[test]
fn cleartext_http_is_rejected_unless_allowed() {
    let transport = HttpTransport::new(HttpTransportConfig::default()).expect("transport");
    let url = Url::parse("http://127.0.0.1:1/").expect("url");
    let error = transport.send(&url, "<Request/>").expect_err("must reject http");
    assert!(matches!(error, TransportError::Exchange(_)));
}

#[test]
fn oversized_replies_fail_closed() {
    let (url, handle) = one_shot_server("<Reply>0123456789012345678901234567890123456789</Reply>", 200);
    let transport = HttpTransport::new(HttpTransportConfig {
        allow_http: true,
        max_response_bytes: 8,
        ..HttpTransportConfig::default()
    })
    .expect("transport");

    let error = transport.send(&url, "<Request/>").expect_err("must fail closed");
    assert!(matches!(error, TransportError::Exchange(_)));
    handle.join().expect("server thread");
}

#[test]
fn gateway_error_statuses_are_transport_failures() {
    let (url, handle) = one_shot_server("denied", 500);
    let transport = loopback_transport();
    let error = transport.send(&url, "<Request/>").expect_err("must fail");
    assert!(matches!(error, TransportError::Exchange(_)));
    handle.join().expect("server thread");
}

// ============================================================================
// SECTION: Schema Gate
// ============================================================================

#[test]
fn reachable_schema_passes_well_formed_documents() {
    let (url, handle) = one_shot_server("<xs:schema/>", 200);
    let gate = ReachabilitySchemaGate::new(SchemaGateConfig {
        allow_http: true,
        ..SchemaGateConfig::default()
    })
    .expect("gate");

    gate.check(&url, "<Document/>").expect("pass");
    handle.join().expect("server thread");
}

#[test]
fn missing_schema_is_a_hard_failure() {
    let (url, handle) = one_shot_server("not here", 404);
    let gate = ReachabilitySchemaGate::new(SchemaGateConfig {
        allow_http: true,
        ..SchemaGateConfig::default()
    })
    .expect("gate");

    let error = gate.check(&url, "<Document/>").expect_err("must fail");
    assert!(matches!(error, SchemaGateError::Unreachable(_)));
    handle.join().expect("server thread");
}

#[test]
fn malformed_documents_are_rejected() {
    let (url, handle) = one_shot_server("<xs:schema/>", 200);
    let gate = ReachabilitySchemaGate::new(SchemaGateConfig {
        allow_http: true,
        ..SchemaGateConfig::default()
    })
    .expect("gate");

    let error = gate.check(&url, "<Broken").expect_err("must reject");
    assert!(matches!(error, SchemaGateError::Rejected(_)));
    handle.join().expect("server thread");
}

// ============================================================================
// SECTION: End-to-End Client Exchange
// ============================================================================

#[test]
fn client_exchange_over_the_real_transport() {
    let (url, handle) = one_shot_server(acknowledgement_reply(), 200);
    let mut client = GovTalkClient::new(url, Credentials::new("SENDER01", "secret"), loopback_transport());
    client.set_message_class("HMRC-VAT-DEC").expect("class");
    client.set_message_qualifier("request").expect("qualifier");
    client.set_message_authentication("clear").expect("authentication");
    client.set_message_body(MessageBody::RawText("<Ping/>".to_string()));

    let outcome = client.send_message().expect("send");
    assert!(matches!(outcome, SendOutcome::Acknowledged(_)));
    assert_eq!(client.poll_interval(), Some(10));

    let recorded = handle.join().expect("server thread");
    assert!(recorded.body.contains("<Class>HMRC-VAT-DEC</Class>"));
    assert!(recorded.body.contains("<Method>clear</Method>"));
}
