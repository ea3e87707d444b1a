// crates/govtalk-core/tests/client_flow.rs
// ============================================================================
// Module: Client Flow Tests
// Description: Send/poll state machine, correlation propagation, staleness.
// ============================================================================
//! ## Overview
//! Drives the client against a scripted in-memory transport: required-field
//! gating, acknowledgement retargeting, poll correlation reuse, transport
//! failure staleness, and the generic delete and list requests.

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

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use govtalk_core::Credentials;
use govtalk_core::GovTalkClient;
use govtalk_core::MessageBody;
use govtalk_core::MessageQualifier;
use govtalk_core::SendError;
use govtalk_core::SendOutcome;
use govtalk_core::Transport;
use govtalk_core::TransportError;
use url::Url;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Transport stub with scripted replies and call recording.
#[derive(Clone, Default)]
struct ScriptedTransport {
    calls: Rc<RefCell<Vec<(String, String)>>>,
    replies: Rc<RefCell<VecDeque<Result<String, String>>>>,
}

impl ScriptedTransport {
    fn push_reply(&self, reply: &str) {
        self.replies.borrow_mut().push_back(Ok(reply.to_string()));
    }

    fn push_failure(&self, message: &str) {
        self.replies.borrow_mut().push_back(Err(message.to_string()));
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn call(&self, index: usize) -> (String, String) {
        self.calls.borrow()[index].clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, endpoint: &Url, payload: &str) -> Result<String, TransportError> {
        self.calls.borrow_mut().push((endpoint.to_string(), payload.to_string()));
        match self.replies.borrow_mut().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(TransportError::Exchange(message)),
            None => Err(TransportError::Exchange("no scripted reply".to_string())),
        }
    }
}

fn reply(qualifier: &str, details_extra: &str, govtalk_extra: &str, body: &str) -> String {
    format!(
        "<GovTalkMessage xmlns=\"http://www.govtalk.gov.uk/CM/envelope\">\
         <EnvelopeVersion>2.0</EnvelopeVersion>\
         <Header><MessageDetails>\
         <Class>HMRC-VAT-DEC</Class>\
         <Qualifier>{qualifier}</Qualifier>\
         <TransactionID>17534017891234567</TransactionID>\
         {details_extra}\
         </MessageDetails>\
         <SenderDetails/></Header>\
         <GovTalkDetails>{govtalk_extra}</GovTalkDetails>\
         <Body>{body}</Body>\
         </GovTalkMessage>"
    )
}

fn acknowledgement_reply() -> String {
    reply(
        "acknowledgement",
        "<CorrelationID>1B2F3D4C5E6A7081</CorrelationID>\
         <ResponseEndPoint PollInterval=\"20\">https://poll.gateway.test/submission</ResponseEndPoint>",
        "",
        "",
    )
}

fn ready_client(transport: ScriptedTransport) -> GovTalkClient<ScriptedTransport> {
    let mut client = GovTalkClient::new(
        Url::parse("https://secure.gateway.test/submission").expect("url"),
        Credentials::new("SENDER01", "secret"),
        transport,
    );
    client.set_message_class("HMRC-VAT-DEC").expect("class");
    client.set_message_qualifier("request").expect("qualifier");
    client.set_message_authentication("clear").expect("authentication");
    client.set_message_body(MessageBody::RawText("<Ping/>".to_string()));
    client
}

// ============================================================================
// SECTION: Local Gating
// ============================================================================

#[test]
fn missing_required_fields_never_reach_the_transport() {
    let transport = ScriptedTransport::default();
    let mut client = GovTalkClient::new(
        Url::parse("https://secure.gateway.test/submission").expect("url"),
        Credentials::new("SENDER01", "secret"),
        transport.clone(),
    );
    client.set_message_class("HMRC-VAT-DEC").expect("class");

    let error = client.send_message().expect_err("must fail locally");
    assert!(matches!(error, SendError::Build(_)));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(client.error_log().len(), 1);
    assert_eq!(client.error_log().last().map(|entry| entry.code.as_str()), Some("build_failed"));
}

#[test]
fn poll_without_any_correlation_fails_before_the_network() {
    let transport = ScriptedTransport::default();
    let mut client = ready_client(transport.clone());
    client.set_message_qualifier("poll").expect("qualifier");

    let error = client.send_message().expect_err("must fail locally");
    assert!(matches!(error, SendError::MissingCorrelation));
    assert_eq!(transport.call_count(), 0);
    assert_eq!(
        client.error_log().last().map(|entry| entry.code.as_str()),
        Some("missing_correlation")
    );
}

#[test]
fn invalid_field_setters_log_and_leave_state_unchanged() {
    let transport = ScriptedTransport::default();
    let mut client = ready_client(transport);
    assert!(client.set_message_class("ABCD").is_err());
    assert!(client.set_sender_email("not-an-email").is_err());
    assert_eq!(client.error_log().len(), 2);
    assert_eq!(client.request().class.as_ref().map(|class| class.as_str()), Some("HMRC-VAT-DEC"));
}

// ============================================================================
// SECTION: Acknowledge and Poll
// ============================================================================

#[test]
fn acknowledgement_retargets_the_server_and_surfaces_the_interval() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&acknowledgement_reply());
    let mut client = ready_client(transport.clone());

    let outcome = client.send_message().expect("send");
    assert!(matches!(outcome, SendOutcome::Acknowledged(_)));
    assert_eq!(client.server().as_str(), "https://poll.gateway.test/submission");
    assert_eq!(client.poll_interval(), Some(20));
    assert_eq!(
        client.response_correlation_id().map(|correlation| correlation.as_str()),
        Some("1B2F3D4C5E6A7081")
    );

    // The next send, with no other changes, targets the advertised endpoint.
    transport.push_reply(&reply("response", "", "", "<Done/>"));
    client.set_message_qualifier("poll").expect("qualifier");
    client.send_message().expect("poll");
    let (endpoint, _) = transport.call(1);
    assert_eq!(endpoint, "https://poll.gateway.test/submission");
}

#[test]
fn poll_reuses_the_correlation_from_the_prior_response() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&acknowledgement_reply());
    transport.push_reply(&reply("response", "", "", "<Done/>"));
    let mut client = ready_client(transport.clone());

    client.send_message().expect("send");
    client.set_message_qualifier("poll").expect("qualifier");
    let outcome = client.send_message().expect("poll");
    assert_eq!(outcome, SendOutcome::Completed);

    let (_, payload) = transport.call(1);
    assert!(payload.contains("<CorrelationID>1B2F3D4C5E6A7081</CorrelationID>"));
    assert!(payload.contains("<Qualifier>poll</Qualifier>"));
}

#[test]
fn explicit_correlation_wins_over_the_stored_one() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&acknowledgement_reply());
    transport.push_reply(&reply("response", "", "", "<Done/>"));
    let mut client = ready_client(transport.clone());

    client.send_message().expect("send");
    client.set_message_qualifier("poll").expect("qualifier");
    client.set_message_correlation_id("FFFF0000").expect("correlation");
    client.send_message().expect("poll");

    let (_, payload) = transport.call(1);
    assert!(payload.contains("<CorrelationID>FFFF0000</CorrelationID>"));
}

// ============================================================================
// SECTION: Failure Staleness
// ============================================================================

#[test]
fn transport_failure_keeps_the_prior_response_queryable() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&acknowledgement_reply());
    transport.push_failure("connection reset");
    let mut client = ready_client(transport);

    client.send_message().expect("send");
    let stale_correlation =
        client.response_correlation_id().map(|correlation| correlation.as_str().to_string());

    let error = client.send_message().expect_err("transport must fail");
    assert!(matches!(error, SendError::Transport(_)));
    assert_eq!(
        client.response_correlation_id().map(|correlation| correlation.as_str().to_string()),
        stale_correlation
    );
    assert!(matches!(client.outcome(), Some(SendOutcome::Acknowledged(_))));
}

#[test]
fn response_accessors_are_absent_before_any_send_and_idempotent() {
    let transport = ScriptedTransport::default();
    let client = ready_client(transport);
    assert!(!client.response_has_errors());
    assert!(!client.response_has_errors());
    assert!(client.response().is_none());
    assert!(client.response_qualifier().is_none());
    assert!(client.response_endpoint().is_none());
    assert!(client.poll_interval().is_none());
    assert!(client.full_request_xml().is_none());
    assert!(client.full_response_xml().is_none());
}

#[test]
fn repeated_accessor_reads_return_the_same_values() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&acknowledgement_reply());
    let mut client = ready_client(transport);
    client.send_message().expect("send");

    let first = client.response_has_errors();
    let second = client.response_has_errors();
    assert_eq!(first, second);
    assert_eq!(client.poll_interval(), client.poll_interval());
    assert_eq!(client.response_qualifier(), Some(MessageQualifier::Acknowledgement));
}

// ============================================================================
// SECTION: Gateway Errors
// ============================================================================

#[test]
fn gateway_errors_are_data_not_send_failures() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&reply(
        "error",
        "",
        "<GovTalkErrors><Error><Number>1046</Number><Type>fatal</Type>\
         <Text>Authentication Failure</Text></Error></GovTalkErrors>",
        "",
    ));
    let mut client = ready_client(transport);

    let outcome = client.send_message().expect("exchange itself succeeds");
    assert_eq!(outcome, SendOutcome::Errored);
    assert!(client.response_has_errors());
    let errors = client.response_errors().expect("errors");
    assert_eq!(errors.fatal().len(), 1);
    assert_eq!(errors.fatal()[0].number, "1046");
}

// ============================================================================
// SECTION: Transformations
// ============================================================================

#[test]
fn non_xml_transformations_store_the_reply_without_parsing() {
    let transport = ScriptedTransport::default();
    transport.push_reply("<html><body>rendered</body></html>");
    let mut client = ready_client(transport);
    client.set_message_transformation("HTML").expect("transformation");

    let outcome = client.send_message().expect("send");
    assert_eq!(outcome, SendOutcome::Unparsed);
    assert!(client.response().is_none());
    assert!(!client.response_has_errors());
    assert_eq!(client.full_response_xml(), Some("<html><body>rendered</body></html>"));
}

// ============================================================================
// SECTION: Generic Requests
// ============================================================================

#[test]
fn delete_request_reuses_the_stored_correlation() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&acknowledgement_reply());
    transport.push_reply(&reply("response", "", "", ""));
    let mut client = ready_client(transport.clone());

    client.send_message().expect("send");
    let deleted = client.send_delete_request(None).expect("delete");
    assert!(deleted);

    let (_, payload) = transport.call(1);
    assert!(payload.contains("<Function>delete</Function>"));
    assert!(payload.contains("<CorrelationID>1B2F3D4C5E6A7081</CorrelationID>"));
}

#[test]
fn delete_request_without_correlation_fails_locally() {
    let transport = ScriptedTransport::default();
    let mut client = ready_client(transport.clone());
    let error = client.send_delete_request(None).expect_err("must fail locally");
    assert!(matches!(error, SendError::MissingCorrelation));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn list_request_parses_the_status_report() {
    let transport = ScriptedTransport::default();
    transport.push_reply(&reply(
        "response",
        "",
        "",
        "<StatusReport><StatusRecord>\
         <TimeStamp>18/01/2012 09:30:47</TimeStamp>\
         <CorrelationID>1B2F3D4C</CorrelationID>\
         <TransactionID>17534017891234567</TransactionID>\
         <Status>SUBMISSION_RESPONSE</Status>\
         </StatusRecord></StatusReport>",
    ));
    let mut client = ready_client(transport.clone());

    let records = client.send_list_request(None).expect("list").expect("response records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].correlation_id, "1B2F3D4C");
    assert_eq!(records[0].status, "SUBMISSION_RESPONSE");

    let (_, payload) = transport.call(0);
    assert!(payload.contains("<Function>list</Function>"));
}
