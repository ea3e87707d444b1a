// crates/govtalk-core/src/runtime/client.rs
// ============================================================================
// Module: GovTalk Client
// Description: Send/poll state machine over the envelope engine.
// Purpose: Drive one envelope exchange at a time and track its correlation.
// Dependencies: crate::{core, interfaces, runtime}, serde, thiserror, time, url
// ============================================================================

//! ## Overview
//! The client is a thin holder of configuration: gateway URL, credentials,
//! the injected transport and strategy seams, the envelope request value,
//! and the single last response. Every send re-enters the state machine
//! fresh; the only state carried across sends is the documented last-response
//! cache and the append-only local error log. One logical transaction is in
//! flight at a time: a new send overwrites the only request/response state,
//! and instances share nothing, so concurrent transactions need independent
//! clients.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use url::Url;
use xmltree::Element;
use xmltree::XMLNode;

use crate::core::body::MessageBody;
use crate::core::errorlog::ErrorLog;
use crate::core::errorlog::ErrorLogEntry;
use crate::core::message::AuthenticationMethod;
use crate::core::message::CorrelationId;
use crate::core::message::Credentials;
use crate::core::message::FieldError;
use crate::core::message::MessageClass;
use crate::core::message::MessageFunction;
use crate::core::message::MessageQualifier;
use crate::core::message::SenderEmail;
use crate::core::message::TransactionId;
use crate::core::message::Transformation;
use crate::core::request::EnvelopeRequest;
use crate::core::request::RequiredField;
use crate::core::response::EnvelopeResponse;
use crate::core::response::ResponseEndpoint;
use crate::core::response::ResponseErrors;
use crate::core::routing::ChannelRoute;
use crate::core::routing::ChannelRouteId;
use crate::core::routing::MessageKey;
use crate::core::routing::TargetOrganisation;
use crate::interfaces::AlternativeAuthentication;
use crate::interfaces::DigestError;
use crate::interfaces::FunctionError;
use crate::interfaces::IdentityDigest;
use crate::interfaces::MessageFunctionValidator;
use crate::interfaces::PackageDigest;
use crate::interfaces::SchemaGate;
use crate::interfaces::SchemaGateError;
use crate::interfaces::Transport;
use crate::interfaces::TransportError;
use crate::runtime::builder::BuildError;
use crate::runtime::builder::build_envelope;
use crate::runtime::parser::ParseError;
use crate::runtime::parser::parse_envelope;
use crate::runtime::transaction::fresh_transaction_id;

// ============================================================================
// SECTION: Send Errors
// ============================================================================

/// Failures of one envelope exchange.
///
/// Protocol-level errors reported by the gateway are NOT send failures: the
/// exchange succeeded and the classified buckets carry the data. Callers
/// check [`GovTalkClient::response_has_errors`] for those.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SendError {
    /// Local build failure; nothing reached the wire.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// The package digest hook failed; nothing reached the wire.
    #[error(transparent)]
    Digest(#[from] DigestError),
    /// Outbound or inbound schema gate failure; the exchange did not succeed.
    #[error(transparent)]
    Schema(#[from] SchemaGateError),
    /// Transport failure; no bytes returned, prior response stays queryable.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The reply could not be interpreted as an envelope.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Poll or delete issued with no correlation id available.
    #[error("no correlation id available: set one or send a request first")]
    MissingCorrelation,
}

// ============================================================================
// SECTION: Send Outcome
// ============================================================================

/// Terminal state of one successful exchange.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendOutcome {
    /// Acknowledgement with a poll endpoint: wait at least the advertised
    /// interval, then resend a poll-qualified request.
    Acknowledged(ResponseEndpoint),
    /// Terminal response: the body carries the domain data.
    Completed,
    /// The gateway reported errors; inspect the classified buckets.
    Errored,
    /// Parsed, but neither an acknowledgement with an endpoint nor a
    /// terminal response.
    Parsed(MessageQualifier),
    /// Non-XML transformation: the raw reply is stored, nothing is parsed.
    Unparsed,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Envelope protocol client, generic over its transport.
///
/// # Invariants
/// - Credentials are immutable for the lifetime of the client.
/// - The last response is replaced wholesale on every successful exchange
///   and never merged with a prior one.
/// - No internal synchronization: an instance is single-caller state.
pub struct GovTalkClient<T> {
    /// Gateway URL targeted by the next send.
    server: Url,
    /// Immutable gateway credentials.
    credentials: Credentials,
    /// Injected message transport.
    transport: T,
    /// Department-specific token derivation for `alternative` authentication.
    alternative_auth: Option<Box<dyn AlternativeAuthentication>>,
    /// Pre-transmission package digest hook.
    digest: Box<dyn PackageDigest>,
    /// Optional schema validation gate.
    schema_gate: Option<Box<dyn SchemaGate>>,
    /// Agency message-function validation hook.
    function_validator: Option<Box<dyn MessageFunctionValidator>>,
    /// Outbound envelope state assembled by the caller.
    request: EnvelopeRequest,
    /// Transaction id generated for the last send.
    last_transaction: Option<TransactionId>,
    /// Raw XML of the last transmitted envelope, post-digest.
    last_request_xml: Option<String>,
    /// Raw XML of the last reply.
    last_response_xml: Option<String>,
    /// Parsed model of the last reply.
    last_response: Option<EnvelopeResponse>,
    /// Outcome of the last successful exchange.
    last_outcome: Option<SendOutcome>,
    /// Append-only local error log.
    error_log: ErrorLog,
}

impl<T: Transport> GovTalkClient<T> {
    /// Creates a client for one gateway with one transport.
    #[must_use]
    pub fn new(server: Url, credentials: Credentials, transport: T) -> Self {
        Self {
            server,
            credentials,
            transport,
            alternative_auth: None,
            digest: Box::new(IdentityDigest),
            schema_gate: None,
            function_validator: None,
            request: EnvelopeRequest::new(),
            last_transaction: None,
            last_request_xml: None,
            last_response_xml: None,
            last_response: None,
            last_outcome: None,
            error_log: ErrorLog::new(),
        }
    }

    /// Injects the derivation used by `alternative` authentication.
    #[must_use]
    pub fn with_alternative_authentication(
        mut self,
        derivation: Box<dyn AlternativeAuthentication>,
    ) -> Self {
        self.alternative_auth = Some(derivation);
        self
    }

    /// Replaces the identity digest with an agency package digest.
    #[must_use]
    pub fn with_package_digest(mut self, digest: Box<dyn PackageDigest>) -> Self {
        self.digest = digest;
        self
    }

    /// Injects the schema validation gate.
    #[must_use]
    pub fn with_schema_gate(mut self, gate: Box<dyn SchemaGate>) -> Self {
        self.schema_gate = Some(gate);
        self
    }

    /// Injects an agency message-function validator.
    #[must_use]
    pub fn with_function_validator(mut self, validator: Box<dyn MessageFunctionValidator>) -> Self {
        self.function_validator = Some(validator);
        self
    }

    // ------------------------------------------------------------------
    // Configuration and request state
    // ------------------------------------------------------------------

    /// Returns the gateway URL targeted by the next send.
    #[must_use]
    pub const fn server(&self) -> &Url {
        &self.server
    }

    /// Retargets the gateway, as when polling an advertised endpoint.
    pub fn set_server(&mut self, server: Url) {
        self.server = server;
    }

    /// Returns the envelope request value.
    #[must_use]
    pub const fn request(&self) -> &EnvelopeRequest {
        &self.request
    }

    /// Returns the envelope request value for mutation between sends.
    pub fn request_mut(&mut self) -> &mut EnvelopeRequest {
        &mut self.request
    }

    /// Sets the message class.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ClassLength`] and records a log entry when the
    /// class is out of bounds.
    pub fn set_message_class(&mut self, class: &str) -> Result<(), FieldError> {
        match MessageClass::new(class) {
            Ok(class) => {
                self.request.class = Some(class);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "set_message_class")),
        }
    }

    /// Sets the message qualifier from its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::QualifierUnknown`] and records a log entry for
    /// an unrecognised qualifier.
    pub fn set_message_qualifier(&mut self, qualifier: &str) -> Result<(), FieldError> {
        match MessageQualifier::parse(qualifier) {
            Ok(qualifier) => {
                self.request.qualifier = Some(qualifier);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "set_message_qualifier")),
        }
    }

    /// Sets the message function, applying any injected agency validator.
    ///
    /// # Errors
    ///
    /// Returns [`FunctionError`] and records a log entry when the function is
    /// rejected by the validator.
    pub fn set_message_function(&mut self, function: &str) -> Result<(), FunctionError> {
        if let Some(validator) = self.function_validator.as_deref()
            && let Err(error) = validator.validate(function)
        {
            self.log_error(
                "invalid_message_function",
                &error.to_string(),
                "set_message_function",
            );
            return Err(error);
        }
        self.request.function = Some(MessageFunction::new(function));
        Ok(())
    }

    /// Sets the correlation id for a poll or delete request.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::CorrelationFormat`] and records a log entry when
    /// the id is not `[0-9A-F]{0,32}`.
    pub fn set_message_correlation_id(&mut self, correlation: &str) -> Result<(), FieldError> {
        match CorrelationId::new(correlation) {
            Ok(correlation) => {
                self.request.correlation_id = Some(correlation);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "set_message_correlation_id")),
        }
    }

    /// Clears the correlation id ahead of a fresh submission.
    pub fn clear_message_correlation_id(&mut self) {
        self.request.correlation_id = None;
    }

    /// Sets the response transformation from its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TransformationUnknown`] and records a log entry
    /// for an unrecognised transformation.
    pub fn set_message_transformation(&mut self, transformation: &str) -> Result<(), FieldError> {
        match Transformation::parse(transformation) {
            Ok(transformation) => {
                self.request.transformation = transformation;
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "set_message_transformation")),
        }
    }

    /// Selects the authentication method from its wire form.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::AuthenticationMethodUnknown`] and records a log
    /// entry for an unrecognised method.
    pub fn set_message_authentication(&mut self, method: &str) -> Result<(), FieldError> {
        match AuthenticationMethod::parse(method) {
            Ok(method) => {
                self.request.authentication = Some(method);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "set_message_authentication")),
        }
    }

    /// Sets the sender email address.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::EmailFormat`] and records a log entry when the
    /// address does not match the envelope pattern.
    pub fn set_sender_email(&mut self, address: &str) -> Result<(), FieldError> {
        match SenderEmail::new(address) {
            Ok(address) => {
                self.request.sender_email = Some(address);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "set_sender_email")),
        }
    }

    /// Sets the gateway test flag.
    pub const fn set_test_flag(&mut self, test: bool) {
        self.request.test_flag = test;
    }

    /// Sets the message body.
    pub fn set_message_body(&mut self, body: MessageBody) {
        self.request.body = Some(body);
    }

    /// Sets the additional schema location and, optionally, whether the gate
    /// enforces it.
    pub fn set_schema_location(&mut self, schema: Url, validate: Option<bool>) {
        self.request.schema_location = Some(schema);
        if let Some(validate) = validate {
            self.request.schema_validation = validate;
        } else {
            self.request.schema_validation = true;
        }
    }

    /// Switches schema gate enforcement on or off.
    pub const fn set_schema_validation(&mut self, validate: bool) {
        self.request.schema_validation = validate;
    }

    /// Adds a message key.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::KeyEmpty`] and records a log entry when either
    /// part is empty.
    pub fn add_message_key(&mut self, key_type: &str, value: &str) -> Result<(), FieldError> {
        match MessageKey::new(key_type, value) {
            Ok(key) => {
                self.request.keys.add(key);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "add_message_key")),
        }
    }

    /// Deletes keys by type, optionally narrowed by value; returns the count.
    pub fn delete_message_key(&mut self, key_type: &str, value: Option<&str>) -> usize {
        self.request.keys.delete(key_type, value)
    }

    /// Removes every message key.
    pub fn reset_message_keys(&mut self) {
        self.request.keys.reset();
    }

    /// Adds a target organisation, skipping duplicates unless `force`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::TargetOrganisationLength`] and records a log
    /// entry when the name is empty or too long.
    pub fn add_target_organisation(
        &mut self,
        organisation: &str,
        force: bool,
    ) -> Result<(), FieldError> {
        match TargetOrganisation::new(organisation) {
            Ok(organisation) => {
                self.request.target_organisations.add(organisation, force);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "add_target_organisation")),
        }
    }

    /// Deletes every matching target organisation; returns the count.
    pub fn delete_target_organisation(&mut self, organisation: &str) -> usize {
        self.request.target_organisations.delete(organisation)
    }

    /// Removes every target organisation.
    pub fn reset_target_organisations(&mut self) {
        self.request.target_organisations.reset();
    }

    /// Adds a channel route, stamped now unless a timestamp is supplied.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] and records a log entry when the route is
    /// invalid.
    pub fn add_channel_route(
        &mut self,
        uri: &str,
        product: Option<String>,
        version: Option<String>,
        ids: Vec<ChannelRouteId>,
        timestamp: Option<OffsetDateTime>,
        force: bool,
    ) -> Result<(), FieldError> {
        let stamped_at = timestamp.unwrap_or_else(OffsetDateTime::now_utc);
        match ChannelRoute::new(uri, product, version, ids, stamped_at) {
            Ok(route) => {
                self.request.channel_routes.add(route, force);
                Ok(())
            }
            Err(error) => Err(self.log_field_error(error, "add_channel_route")),
        }
    }

    /// Removes every caller-added channel route.
    pub fn reset_channel_routes(&mut self) {
        self.request.channel_routes.reset();
    }

    // ------------------------------------------------------------------
    // Response accessors
    // ------------------------------------------------------------------

    /// Returns the transaction id of the last send, if one happened.
    #[must_use]
    pub const fn transaction_id(&self) -> Option<&TransactionId> {
        self.last_transaction.as_ref()
    }

    /// Returns the raw XML transmitted by the last send.
    #[must_use]
    pub fn full_request_xml(&self) -> Option<&str> {
        self.last_request_xml.as_deref()
    }

    /// Returns the raw XML received by the last send.
    #[must_use]
    pub fn full_response_xml(&self) -> Option<&str> {
        self.last_response_xml.as_deref()
    }

    /// Returns the parsed last response.
    #[must_use]
    pub const fn response(&self) -> Option<&EnvelopeResponse> {
        self.last_response.as_ref()
    }

    /// Returns the outcome of the last successful exchange.
    #[must_use]
    pub const fn outcome(&self) -> Option<&SendOutcome> {
        self.last_outcome.as_ref()
    }

    /// Returns the last response qualifier.
    #[must_use]
    pub fn response_qualifier(&self) -> Option<MessageQualifier> {
        self.last_response.as_ref().map(|response| response.qualifier)
    }

    /// Returns the correlation id issued by the gateway, if any.
    #[must_use]
    pub fn response_correlation_id(&self) -> Option<&CorrelationId> {
        self.last_response.as_ref().and_then(|response| response.correlation_id.as_ref())
    }

    /// Returns the gateway timestamp text, if any.
    #[must_use]
    pub fn gateway_timestamp(&self) -> Option<&str> {
        self.last_response.as_ref().and_then(|response| response.gateway_timestamp.as_deref())
    }

    /// Returns the advertised poll endpoint, if any.
    #[must_use]
    pub fn response_endpoint(&self) -> Option<&ResponseEndpoint> {
        self.last_response.as_ref().and_then(|response| response.response_endpoint.as_ref())
    }

    /// Returns the advertised poll interval in seconds, if any.
    #[must_use]
    pub fn poll_interval(&self) -> Option<u64> {
        self.response_endpoint().and_then(|endpoint| endpoint.poll_interval)
    }

    /// Returns the classified gateway errors of the last response.
    #[must_use]
    pub fn response_errors(&self) -> Option<&ResponseErrors> {
        self.last_response.as_ref().map(|response| &response.errors)
    }

    /// Returns true when the last response carried gateway errors.
    ///
    /// Never raises: with no parsed response this is simply false.
    #[must_use]
    pub fn response_has_errors(&self) -> bool {
        self.last_response.as_ref().is_some_and(EnvelopeResponse::has_errors)
    }

    /// Returns the inner XML of the last response body.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        self.last_response.as_ref().map(|response| response.body.as_str())
    }

    /// Returns the local error log.
    #[must_use]
    pub const fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    /// Clears the local error log.
    pub fn clear_error_log(&mut self) {
        self.error_log.clear();
    }

    // ------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------

    /// Sends the assembled envelope and parses the reply.
    ///
    /// Success means the message was transmitted and a reply interpreted; it
    /// says nothing about gateway acceptance. Callers inspect the outcome
    /// and the classified error buckets for that. On failure the prior
    /// response, if any, remains queryable but stale.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] per the local/transport/schema taxonomy.
    pub fn send_message(&mut self) -> Result<SendOutcome, SendError> {
        let mut effective = self.request.clone();

        // Poll requests reuse the prior response's correlation id when the
        // caller has not set one explicitly.
        if effective.qualifier == Some(MessageQualifier::Poll)
            && effective.correlation_id.is_none()
        {
            match self.response_correlation_id().cloned() {
                Some(correlation) => effective.correlation_id = Some(correlation),
                None => {
                    self.log_error(
                        "missing_correlation",
                        "poll requested with no correlation id available",
                        "send_message",
                    );
                    return Err(SendError::MissingCorrelation);
                }
            }
        }

        let transaction = fresh_transaction_id();
        let package = match build_envelope(
            &effective,
            &self.credentials,
            &transaction,
            self.alternative_auth.as_deref(),
            OffsetDateTime::now_utc(),
        ) {
            Ok(package) => package,
            Err(error) => {
                self.log_error("build_failed", &error.to_string(), "send_message");
                return Err(error.into());
            }
        };

        // The digest hook runs exactly once, after full serialization; its
        // output is what is validated and transmitted.
        let package = self.digest.digest(package)?;

        if let Some(schema) = effective.schema_location.as_ref()
            && effective.schema_validation
            && let Some(gate) = self.schema_gate.as_deref()
        {
            gate.check(schema, &package)?;
        }

        // The transmitted request stays available for logging even when the
        // exchange fails; the response state is only committed on success.
        self.last_transaction = Some(transaction);
        self.last_request_xml = Some(package);
        let package = self.last_request_xml.as_deref().unwrap_or_default();
        let raw_response = self.transport.send(&self.server, package)?;

        if effective.transformation != Transformation::Xml {
            // Documented no-op: the reply is stored but never interpreted.
            self.last_response_xml = Some(raw_response);
            self.last_response = None;
            self.last_outcome = Some(SendOutcome::Unparsed);
            return Ok(SendOutcome::Unparsed);
        }

        if let Some(schema) = effective.schema_location.as_ref()
            && effective.schema_validation
            && let Some(gate) = self.schema_gate.as_deref()
        {
            gate.check(schema, &raw_response)?;
        }

        let response = parse_envelope(&raw_response)?;

        self.last_response_xml = Some(raw_response);
        let outcome = outcome_of(&response);
        if let SendOutcome::Acknowledged(endpoint) = &outcome
            && let Ok(poll_url) = Url::parse(&endpoint.endpoint)
        {
            self.server = poll_url;
        }
        self.last_response = Some(response);
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    /// Sends a generic delete request for a stored correlation.
    ///
    /// With no explicit pair, the last response's correlation id and the
    /// current message class are used. Returns true when the gateway
    /// reported no errors for the delete.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::MissingCorrelation`] before any network call
    /// when no correlation id is available, or any exchange failure.
    pub fn send_delete_request(
        &mut self,
        correlation: Option<(CorrelationId, MessageClass)>,
    ) -> Result<bool, SendError> {
        let (correlation, class) = match correlation {
            Some(pair) => pair,
            None => {
                let Some(correlation) = self.response_correlation_id().cloned() else {
                    self.log_error(
                        "missing_correlation",
                        "delete requested with no correlation id available",
                        "send_delete_request",
                    );
                    return Err(SendError::MissingCorrelation);
                };
                let Some(class) = self.request.class.clone() else {
                    return Err(SendError::Build(BuildError::MissingField(RequiredField::Class)));
                };
                (correlation, class)
            }
        };

        self.request.class = Some(class);
        self.request.qualifier = Some(MessageQualifier::Request);
        self.request.function = Some(MessageFunction::new(MessageFunction::DELETE));
        self.request.correlation_id = Some(correlation);
        self.request.body = Some(MessageBody::empty());

        let outcome = self.send_message()?;
        Ok(!matches!(outcome, SendOutcome::Errored))
    }

    /// Sends a generic list request and parses the status report.
    ///
    /// Returns `None` when the reply is not a terminal response or carries
    /// gateway errors; those stay available through the response accessors.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] for any exchange failure.
    pub fn send_list_request(
        &mut self,
        class: Option<MessageClass>,
    ) -> Result<Option<Vec<StatusRecord>>, SendError> {
        if let Some(class) = class {
            self.request.class = Some(class);
        }
        self.request.qualifier = Some(MessageQualifier::Request);
        self.request.function = Some(MessageFunction::new(MessageFunction::LIST));
        self.request.correlation_id = None;
        self.request.body = Some(MessageBody::empty());

        let outcome = self.send_message()?;
        if outcome != SendOutcome::Completed {
            return Ok(None);
        }
        Ok(self.last_response.as_ref().map(status_records))
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    /// Records a field error and hands it back for propagation.
    fn log_field_error(&mut self, error: FieldError, operation: &str) -> FieldError {
        self.log_error(field_error_code(&error), &error.to_string(), operation);
        error
    }

    /// Appends one entry to the local error log.
    fn log_error(&mut self, code: &str, message: &str, operation: &str) {
        self.error_log.append(ErrorLogEntry {
            timestamp_millis: now_millis(),
            code: code.to_string(),
            message: Some(message.to_string()),
            source_operation: Some(operation.to_string()),
        });
    }
}

// ============================================================================
// SECTION: Status Records
// ============================================================================

/// One `StatusRecord` from a list-request status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Gateway-formatted submission timestamp, as received.
    pub timestamp: String,
    /// Correlation id of the stored submission.
    pub correlation_id: String,
    /// Transaction id of the stored submission.
    pub transaction_id: String,
    /// Gateway status of the stored submission.
    pub status: String,
}

/// Extracts status records from a list-request response body.
fn status_records(response: &EnvelopeResponse) -> Vec<StatusRecord> {
    let Ok(Some(report)) = response.body_element() else {
        return Vec::new();
    };
    if report.name != "StatusReport" {
        return Vec::new();
    }
    report
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(record) if record.name == "StatusRecord" => Some(StatusRecord {
                timestamp: record_text(record, "TimeStamp"),
                correlation_id: record_text(record, "CorrelationID"),
                transaction_id: record_text(record, "TransactionID"),
                status: record_text(record, "Status"),
            }),
            _ => None,
        })
        .collect()
}

/// Returns the text of a named status-record child.
fn record_text(record: &Element, name: &str) -> String {
    record
        .get_child(name)
        .and_then(|child| child.get_text().map(|text| text.into_owned()))
        .unwrap_or_default()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a parsed response onto its terminal state.
fn outcome_of(response: &EnvelopeResponse) -> SendOutcome {
    if response.has_errors() {
        return SendOutcome::Errored;
    }
    match (response.qualifier, response.response_endpoint.as_ref()) {
        (MessageQualifier::Acknowledgement, Some(endpoint)) => {
            SendOutcome::Acknowledged(endpoint.clone())
        }
        (MessageQualifier::Response, _) => SendOutcome::Completed,
        (qualifier, _) => SendOutcome::Parsed(qualifier),
    }
}

/// Returns the log code for a field error.
fn field_error_code(error: &FieldError) -> &'static str {
    match error {
        FieldError::ClassLength { .. } => "invalid_message_class",
        FieldError::QualifierUnknown { .. } => "invalid_message_qualifier",
        FieldError::TransformationUnknown { .. } => "invalid_transformation",
        FieldError::AuthenticationMethodUnknown { .. } => "invalid_authentication_method",
        FieldError::TransactionNotNumeric => "invalid_transaction_id",
        FieldError::CorrelationFormat => "invalid_correlation_id",
        FieldError::EmailFormat => "invalid_sender_email",
        FieldError::KeyEmpty => "invalid_message_key",
        FieldError::TargetOrganisationLength => "invalid_target_organisation",
        FieldError::RouteUriEmpty | FieldError::RouteTimestamp => "invalid_channel_route",
    }
}

/// Current wall clock as unix milliseconds, saturating on overflow.
fn now_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
