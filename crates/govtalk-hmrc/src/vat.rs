// crates/govtalk-hmrc/src/vat.rs
// ============================================================================
// Module: HMRC VAT Declarations
// Description: VAT declaration submission and poll service (V2 filing).
// Purpose: Build IRenvelope bodies and drive the submit/poll lifecycle.
// Dependencies: crate::{agent, irmark}, govtalk-core, thiserror, url, xmltree
// ============================================================================

//! ## Overview
//! The VAT service files `HMRC-VAT-DEC` declarations: it validates the
//! return fields, derives boxes 3 and 5 when not supplied, builds the
//! IRenvelope body with the IRmark placeholder, and interprets the
//! acknowledgement/poll replies including the payment notification. Gateway
//! errors surface as data, never as panics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use govtalk_core::CorrelationId;
use govtalk_core::Credentials;
use govtalk_core::FieldError;
use govtalk_core::FunctionError;
use govtalk_core::GovTalkClient;
use govtalk_core::MessageBody;
use govtalk_core::ResponseEndpoint;
use govtalk_core::ResponseErrors;
use govtalk_core::SendError;
use govtalk_core::SendOutcome;
use govtalk_core::Transport;
use govtalk_core::XmlFragment;
use thiserror::Error;
use url::Url;
use xmltree::Element;
use xmltree::XMLNode;

use crate::agent::AgentDetails;
use crate::irmark::IRMARK_PLACEHOLDER;
use crate::irmark::IrmarkDigest;

// ============================================================================
// SECTION: Wire Constants
// ============================================================================

/// Message class for VAT declarations.
pub const VAT_MESSAGE_CLASS: &str = "HMRC-VAT-DEC";
/// Additional schema for the V2 VAT declaration request.
pub const VAT_SCHEMA: &str =
    "http://www.govtalk.gov.uk/taxation/vat/vatdeclaration/2/VATDeclarationRequest-v2-1.xsd";
/// Namespace of the IRenvelope body.
pub const VAT_NAMESPACE: &str = "http://www.govtalk.gov.uk/taxation/vat/vatdeclaration/2";

/// URI of this extension's channel route.
const EXTENSION_ROUTE_URI: &str = "https://crates.io/crates/govtalk-hmrc";
/// Product name of this extension's channel route.
const EXTENSION_ROUTE_PRODUCT: &str = "govtalk-hmrc";
/// Product version of this extension's channel route.
const EXTENSION_ROUTE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sender capacities accepted by the filing system.
const SENDER_CAPACITIES: [&str; 10] = [
    "Individual",
    "Company",
    "Agent",
    "Bureau",
    "Partnership",
    "Trust",
    "Employer",
    "Government",
    "Acting in Capacity",
    "Other",
];

// ============================================================================
// SECTION: Service Endpoints
// ============================================================================

/// Known VAT filing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VatServiceEndpoint {
    /// Production Government Gateway.
    Live,
    /// HMRC third-party validation service.
    Tpvs,
    /// Gateway VSIPS development service.
    Vsips,
}

impl VatServiceEndpoint {
    /// Returns the gateway URL for this endpoint.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Live => "https://secure.gateway.gov.uk/submission",
            Self::Tpvs => "https://www.tpvs.hmrc.gov.uk/HMRC/VATDEC",
            Self::Vsips => "https://secure.dev.gateway.gov.uk/submission",
        }
    }

    /// Returns true for test services, which set the gateway test flag.
    #[must_use]
    pub const fn is_test(self) -> bool {
        !matches!(self, Self::Live)
    }
}

// ============================================================================
// SECTION: VAT Errors
// ============================================================================

/// Failures while validating or filing a VAT declaration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum VatError {
    /// A service or schema URL failed to parse.
    #[error("service url is invalid: {0}")]
    InvalidEndpoint(String),
    /// VAT number is not 9-12 digits with an optional GB prefix.
    #[error("vat number must be 9-12 digits with an optional GB prefix")]
    InvalidVatNumber,
    /// Return period is not in YYYY-MM form.
    #[error("return period must be in YYYY-MM form")]
    InvalidPeriod,
    /// Sender capacity is not one of the accepted capacities.
    #[error("sender capacity `{0}` is not recognised")]
    InvalidCapacity(String),
    /// Net VAT resolved to a negative amount.
    #[error("net vat cannot be negative")]
    NegativeNetVat,
    /// An envelope field was rejected.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// A message function was rejected.
    #[error(transparent)]
    Function(#[from] FunctionError),
    /// The exchange itself failed.
    #[error(transparent)]
    Send(#[from] SendError),
    /// The gateway reported protocol-level errors.
    #[error("gateway reported {} classified errors", .0.len())]
    Gateway(ResponseErrors),
    /// The reply had an unexpected shape.
    #[error("unexpected gateway response: {0}")]
    UnexpectedResponse(String),
}

// ============================================================================
// SECTION: Declaration Model
// ============================================================================

/// Box values of a VAT return; boxes 3 and 5 are derived when absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VatReturnBoxes {
    /// Box 1: VAT due on outputs.
    pub vat_due_on_outputs: f64,
    /// Box 2: VAT due on EC acquisitions.
    pub vat_due_on_ec_acquisitions: f64,
    /// Box 3: total VAT; box 1 + box 2 when not supplied.
    pub total_vat: Option<f64>,
    /// Box 4: VAT reclaimed on inputs.
    pub vat_reclaimed_on_inputs: f64,
    /// Box 5: net VAT; |box 3 - box 4| when not supplied.
    pub net_vat: Option<f64>,
    /// Box 6: net sales and outputs.
    pub net_sales_and_outputs: f64,
    /// Box 7: net purchases and inputs.
    pub net_purchases_and_inputs: f64,
    /// Box 8: net EC supplies.
    pub net_ec_supplies: f64,
    /// Box 9: net EC acquisitions.
    pub net_ec_acquisitions: f64,
}

/// A validated VAT declaration ready for filing.
///
/// # Invariants
/// - Construction resolves boxes 3 and 5 and rejects a negative box 5.
#[derive(Debug, Clone, PartialEq)]
pub struct VatDeclaration {
    /// Trimmed VAT registration number, with any GB prefix preserved.
    vat_number: String,
    /// Return period in YYYY-MM form.
    period: String,
    /// Capacity the return is submitted under.
    sender_capacity: String,
    /// Box values with 3 and 5 resolved.
    boxes: VatReturnBoxes,
    /// Resolved box 3.
    total_vat: f64,
    /// Resolved box 5.
    net_vat: f64,
    /// Whether this is a final return.
    final_return: bool,
}

impl VatDeclaration {
    /// Validates the declaration fields and resolves the derived boxes.
    ///
    /// # Errors
    ///
    /// Returns [`VatError`] when the VAT number, period, or capacity is
    /// invalid, or when the resolved net VAT is negative.
    pub fn new(
        vat_number: &str,
        period: &str,
        sender_capacity: &str,
        boxes: VatReturnBoxes,
        final_return: bool,
    ) -> Result<Self, VatError> {
        let vat_number: String = vat_number.split_whitespace().collect();
        if !is_valid_vat_number(&vat_number) {
            return Err(VatError::InvalidVatNumber);
        }
        if !is_valid_period(period) {
            return Err(VatError::InvalidPeriod);
        }
        if !SENDER_CAPACITIES.contains(&sender_capacity) {
            return Err(VatError::InvalidCapacity(sender_capacity.to_string()));
        }
        let total_vat = boxes
            .total_vat
            .unwrap_or(boxes.vat_due_on_outputs + boxes.vat_due_on_ec_acquisitions);
        let net_vat =
            boxes.net_vat.unwrap_or_else(|| (total_vat - boxes.vat_reclaimed_on_inputs).abs());
        if net_vat < 0.0 {
            return Err(VatError::NegativeNetVat);
        }
        Ok(Self {
            vat_number,
            period: period.to_string(),
            sender_capacity: sender_capacity.to_string(),
            boxes,
            total_vat,
            net_vat,
            final_return,
        })
    }

    /// Returns the trimmed VAT registration number.
    #[must_use]
    pub fn vat_number(&self) -> &str {
        &self.vat_number
    }

    /// Returns the return period.
    #[must_use]
    pub fn period(&self) -> &str {
        &self.period
    }

    /// Returns the resolved box 3 value.
    #[must_use]
    pub const fn total_vat(&self) -> f64 {
        self.total_vat
    }

    /// Returns the resolved box 5 value.
    #[must_use]
    pub const fn net_vat(&self) -> f64 {
        self.net_vat
    }

    /// Renders the IRenvelope body for this declaration.
    #[must_use]
    pub fn body_fragment(&self, agent: Option<&AgentDetails>, with_irmark: bool) -> XmlFragment {
        let mut envelope = Element::new("IRenvelope");
        envelope.attributes.insert("xmlns".to_string(), VAT_NAMESPACE.to_string());

        let mut header = Element::new("IRheader");
        let mut keys = Element::new("Keys");
        let mut key = Element::new("Key");
        key.attributes.insert("Type".to_string(), "VATRegNo".to_string());
        key.children.push(XMLNode::Text(self.vat_number.clone()));
        keys.children.push(XMLNode::Element(key));
        header.children.push(XMLNode::Element(keys));
        push_leaf(&mut header, "PeriodID", &self.period);
        if let Some(agent) = agent {
            header.children.push(XMLNode::Element(agent.to_element()));
        }
        push_leaf(&mut header, "DefaultCurrency", "GBP");
        if with_irmark {
            let mut irmark = Element::new("IRmark");
            irmark.attributes.insert("Type".to_string(), "generic".to_string());
            irmark.children.push(XMLNode::Text(IRMARK_PLACEHOLDER.to_string()));
            header.children.push(XMLNode::Element(irmark));
        }
        push_leaf(&mut header, "Sender", &self.sender_capacity);
        envelope.children.push(XMLNode::Element(header));

        let mut request = Element::new("VATDeclarationRequest");
        if self.final_return {
            request.attributes.insert("finalReturn".to_string(), "yes".to_string());
        }
        push_leaf(&mut request, "VATDueOnOutputs", &money(self.boxes.vat_due_on_outputs));
        push_leaf(
            &mut request,
            "VATDueOnECAcquisitions",
            &money(self.boxes.vat_due_on_ec_acquisitions),
        );
        push_leaf(&mut request, "TotalVAT", &money(self.total_vat));
        push_leaf(&mut request, "VATReclaimedOnInputs", &money(self.boxes.vat_reclaimed_on_inputs));
        push_leaf(&mut request, "NetVAT", &money(self.net_vat));
        push_leaf(&mut request, "NetSalesAndOutputs", &whole(self.boxes.net_sales_and_outputs));
        push_leaf(
            &mut request,
            "NetPurchasesAndInputs",
            &whole(self.boxes.net_purchases_and_inputs),
        );
        push_leaf(&mut request, "NetECSupplies", &whole(self.boxes.net_ec_supplies));
        push_leaf(&mut request, "NetECAcquisitions", &whole(self.boxes.net_ec_acquisitions));
        envelope.children.push(XMLNode::Element(request));

        XmlFragment::from_element(envelope)
    }
}

// ============================================================================
// SECTION: Receipts and Poll Outcomes
// ============================================================================

/// Receipt for a submission the gateway is still processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatSubmissionReceipt {
    /// Correlation id to quote when polling.
    pub correlation_id: CorrelationId,
    /// Endpoint and recommended wait advertised by the gateway.
    pub endpoint: ResponseEndpoint,
}

/// VAT period echoed in an accepted declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatPeriod {
    /// Period identifier.
    pub id: String,
    /// Period start date, as received.
    pub start: String,
    /// Period end date, as received.
    pub end: String,
}

/// How any VAT due will move, per the payment notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VatPaymentMethod {
    /// No payment is due.
    NilPayment,
    /// A repayment from HMRC is due.
    Repayment,
    /// Payment will be collected by the standing direct debit.
    DirectDebit {
        /// Collection date, as received.
        collection_date: String,
    },
    /// Payment should be made by other means.
    PaymentRequest {
        /// Direct debit instruction status, as received.
        instruction_status: String,
    },
}

/// Payment notification of an accepted declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatPayment {
    /// Narrative generated by HMRC.
    pub narrative: String,
    /// Net VAT due following the return.
    pub net_vat: String,
    /// Payment method, when the notification carried an indicator.
    pub method: Option<VatPaymentMethod>,
}

/// An accepted VAT declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VatAcceptance {
    /// Acceptance messages.
    pub messages: Vec<String>,
    /// IRmark receipt message, when present.
    pub irmark_receipt: Option<String>,
    /// Time the submission was accepted, as received.
    pub accepted_time: String,
    /// Period the return covers.
    pub period: VatPeriod,
    /// Payment due date, as received, when present.
    pub payment_due_date: Option<String>,
    /// Payment notification.
    pub payment: VatPayment,
}

/// Result of polling a pending declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum VatPollOutcome {
    /// Still processing: wait the advertised interval and poll again.
    Pending(VatSubmissionReceipt),
    /// Accepted: the declaration response data.
    Accepted(Box<VatAcceptance>),
}

// ============================================================================
// SECTION: VAT Service
// ============================================================================

/// HMRC VAT declaration service over a GovTalk client.
///
/// # Invariants
/// - The IRmark digest hook is always installed; disabling generation stops
///   the placeholder from being emitted instead of removing the hook.
pub struct VatService<T> {
    /// Underlying envelope client.
    client: GovTalkClient<T>,
    /// Agent details emitted into IRheader, when set.
    agent: Option<AgentDetails>,
    /// Whether the IRmark placeholder is emitted.
    generate_irmark: bool,
    /// Whether accepted declarations are deleted from the gateway.
    tidy_gateway: bool,
}

impl<T: Transport> VatService<T> {
    /// Creates a VAT service against a known filing endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`VatError`] when the endpoint or schema URL cannot be
    /// parsed, which indicates a broken build rather than caller input.
    pub fn new(
        sender_id: &str,
        password: &str,
        endpoint: VatServiceEndpoint,
        transport: T,
    ) -> Result<Self, VatError> {
        let server = Url::parse(endpoint.url())
            .map_err(|error| VatError::InvalidEndpoint(error.to_string()))?;
        let schema =
            Url::parse(VAT_SCHEMA).map_err(|error| VatError::InvalidEndpoint(error.to_string()))?;
        let mut client = GovTalkClient::new(server, Credentials::new(sender_id, password), transport)
            .with_package_digest(Box::new(IrmarkDigest::new()));
        client.set_schema_location(schema, Some(false));
        client.set_message_authentication("clear")?;
        if endpoint.is_test() {
            client.set_test_flag(true);
        }
        Ok(Self {
            client,
            agent: None,
            generate_irmark: true,
            tidy_gateway: false,
        })
    }

    /// Sets the agent details emitted into IRheader.
    pub fn set_agent_details(&mut self, agent: AgentDetails) {
        self.agent = Some(agent);
    }

    /// Turns IRmark placeholder generation on or off.
    pub const fn set_irmark_generation(&mut self, enabled: bool) {
        self.generate_irmark = enabled;
    }

    /// Turns gateway tidying (delete after acceptance) on or off.
    pub const fn set_gateway_tidy(&mut self, enabled: bool) {
        self.tidy_gateway = enabled;
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &GovTalkClient<T> {
        &self.client
    }

    /// Returns the underlying client for direct configuration.
    pub fn client_mut(&mut self) -> &mut GovTalkClient<T> {
        &mut self.client
    }

    /// Submits a VAT declaration.
    ///
    /// # Errors
    ///
    /// Returns [`VatError::Gateway`] when the gateway classifies errors,
    /// [`VatError::UnexpectedResponse`] when the reply is not an
    /// acknowledgement, or any exchange failure.
    pub fn submit(&mut self, declaration: &VatDeclaration) -> Result<VatSubmissionReceipt, VatError> {
        self.client.reset_message_keys();
        self.client.add_message_key("VATRegNo", declaration.vat_number())?;
        self.client.set_message_class(VAT_MESSAGE_CLASS)?;
        self.client.set_message_qualifier("request")?;
        self.client.set_message_function("submit")?;
        self.client.clear_message_correlation_id();
        let body = declaration.body_fragment(self.agent.as_ref(), self.generate_irmark);
        self.client.set_message_body(MessageBody::from(body));
        self.client.add_channel_route(
            EXTENSION_ROUTE_URI,
            Some(EXTENSION_ROUTE_PRODUCT.to_string()),
            Some(EXTENSION_ROUTE_VERSION.to_string()),
            Vec::new(),
            None,
            false,
        )?;

        match self.client.send_message()? {
            SendOutcome::Acknowledged(endpoint) => {
                let correlation = self
                    .client
                    .response_correlation_id()
                    .cloned()
                    .ok_or_else(|| {
                        VatError::UnexpectedResponse(
                            "acknowledgement carried no correlation id".to_string(),
                        )
                    })?;
                Ok(VatSubmissionReceipt {
                    correlation_id: correlation,
                    endpoint,
                })
            }
            SendOutcome::Errored => Err(self.gateway_errors()),
            other => Err(VatError::UnexpectedResponse(format!(
                "expected an acknowledgement, got {}",
                outcome_label(&other)
            ))),
        }
    }

    /// Polls the gateway for the declaration result.
    ///
    /// The correlation id defaults to the one from the prior response; a
    /// poll URL defaults to the endpoint advertised by the acknowledgement
    /// (the client already retargeted itself).
    ///
    /// # Errors
    ///
    /// Returns [`VatError::Gateway`] when the gateway classifies errors, or
    /// any exchange failure.
    pub fn poll(
        &mut self,
        correlation: Option<CorrelationId>,
        poll_url: Option<Url>,
    ) -> Result<VatPollOutcome, VatError> {
        if let Some(correlation) = correlation {
            self.client.request_mut().correlation_id = Some(correlation);
        }
        if let Some(poll_url) = poll_url {
            self.client.set_server(poll_url);
        }
        self.client.set_message_class(VAT_MESSAGE_CLASS)?;
        self.client.set_message_qualifier("poll")?;
        self.client.set_message_function("submit")?;
        self.client.reset_message_keys();
        self.client.set_message_body(MessageBody::empty());

        match self.client.send_message()? {
            SendOutcome::Acknowledged(endpoint) => {
                let correlation = self
                    .client
                    .response_correlation_id()
                    .cloned()
                    .ok_or_else(|| {
                        VatError::UnexpectedResponse(
                            "acknowledgement carried no correlation id".to_string(),
                        )
                    })?;
                Ok(VatPollOutcome::Pending(VatSubmissionReceipt {
                    correlation_id: correlation,
                    endpoint,
                }))
            }
            SendOutcome::Completed => {
                let acceptance = self.parse_acceptance()?;
                if self.tidy_gateway {
                    // Tidy failures are deliberately not surfaced; the
                    // acceptance has already been extracted.
                    let _ = self.client.send_delete_request(None);
                }
                Ok(VatPollOutcome::Accepted(Box::new(acceptance)))
            }
            SendOutcome::Errored => Err(self.gateway_errors()),
            other => Err(VatError::UnexpectedResponse(format!(
                "expected an acknowledgement or response, got {}",
                outcome_label(&other)
            ))),
        }
    }

    /// Clones the classified errors of the last response into a `VatError`.
    fn gateway_errors(&self) -> VatError {
        self.client
            .response_errors()
            .cloned()
            .map_or_else(
                || VatError::UnexpectedResponse("errored outcome without errors".to_string()),
                VatError::Gateway,
            )
    }

    /// Parses the SuccessResponse body of a completed poll.
    fn parse_acceptance(&self) -> Result<VatAcceptance, VatError> {
        let body = self
            .client
            .response()
            .ok_or_else(|| VatError::UnexpectedResponse("no response available".to_string()))?
            .body_element()
            .map_err(|error| VatError::UnexpectedResponse(error.to_string()))?
            .ok_or_else(|| VatError::UnexpectedResponse("response body is empty".to_string()))?;
        if body.name != "SuccessResponse" {
            return Err(VatError::UnexpectedResponse(format!(
                "expected SuccessResponse, got {}",
                body.name
            )));
        }
        parse_success_response(&body)
    }
}

// ============================================================================
// SECTION: Response Parsing
// ============================================================================

/// Parses a SuccessResponse element into a declaration acceptance.
fn parse_success_response(success: &Element) -> Result<VatAcceptance, VatError> {
    let messages = success
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Element(child) if child.name == "Message" => Some(element_text(child)),
            _ => None,
        })
        .collect();
    let irmark_receipt = success
        .get_child("IRmarkReceipt")
        .and_then(|receipt| receipt.get_child("Message"))
        .map(element_text);
    let accepted_time = child_text(success, "AcceptedTime")
        .ok_or_else(|| VatError::UnexpectedResponse("missing AcceptedTime".to_string()))?;

    let declaration = success
        .get_child("ResponseData")
        .and_then(|data| data.get_child("VATDeclarationResponse"))
        .ok_or_else(|| {
            VatError::UnexpectedResponse("missing VATDeclarationResponse".to_string())
        })?;

    let period_element = declaration
        .get_child("Header")
        .and_then(|header| header.get_child("VATPeriod"))
        .ok_or_else(|| VatError::UnexpectedResponse("missing VATPeriod".to_string()))?;
    let period = VatPeriod {
        id: child_text(period_element, "PeriodId").unwrap_or_default(),
        start: child_text(period_element, "PeriodStartDate").unwrap_or_default(),
        end: child_text(period_element, "PeriodEndDate").unwrap_or_default(),
    };

    let response_body = declaration
        .get_child("Body")
        .ok_or_else(|| VatError::UnexpectedResponse("missing response Body".to_string()))?;
    let payment_due_date = child_text(response_body, "PaymentDueDate");
    let notification = response_body.get_child("PaymentNotification").ok_or_else(|| {
        VatError::UnexpectedResponse("missing PaymentNotification".to_string())
    })?;

    let method = if notification.get_child("NilPaymentIndicator").is_some() {
        Some(VatPaymentMethod::NilPayment)
    } else if notification.get_child("RepaymentIndicator").is_some() {
        Some(VatPaymentMethod::Repayment)
    } else if let Some(status) = notification.get_child("DirectDebitPaymentStatus") {
        Some(VatPaymentMethod::DirectDebit {
            collection_date: child_text(status, "CollectionDate").unwrap_or_default(),
        })
    } else {
        notification.get_child("PaymentRequest").map(|request| {
            VatPaymentMethod::PaymentRequest {
                instruction_status: child_text(request, "DirectDebitInstructionStatus")
                    .unwrap_or_default(),
            }
        })
    };

    Ok(VatAcceptance {
        messages,
        irmark_receipt,
        accepted_time,
        period,
        payment_due_date,
        payment: VatPayment {
            narrative: child_text(notification, "Narrative").unwrap_or_default(),
            net_vat: child_text(notification, "NetVAT").unwrap_or_default(),
            method,
        },
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a short label for a send outcome, for failure messages.
const fn outcome_label(outcome: &SendOutcome) -> &'static str {
    match outcome {
        SendOutcome::Acknowledged(_) => "an acknowledgement",
        SendOutcome::Completed => "a terminal response",
        SendOutcome::Errored => "a gateway error report",
        SendOutcome::Parsed(_) => "an unclassified reply",
        SendOutcome::Unparsed => "an unparsed reply",
    }
}

/// Checks the VAT registration number form: optional GB prefix, 9-12 digits.
fn is_valid_vat_number(number: &str) -> bool {
    let digits = number.strip_prefix("GB").unwrap_or(number);
    (9..=12).contains(&digits.len()) && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Checks the YYYY-MM return period form.
fn is_valid_period(period: &str) -> bool {
    let bytes = period.as_bytes();
    bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit)
}

/// Formats a monetary box value with two decimal places.
fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// Formats a whole-pound box value, floored.
fn whole(value: f64) -> String {
    format!("{:.0}", value.floor())
}

/// Appends a leaf element with text content.
fn push_leaf(parent: &mut Element, name: &str, text: &str) {
    let mut leaf = Element::new(name);
    leaf.children.push(XMLNode::Text(text.to_string()));
    parent.children.push(XMLNode::Element(leaf));
}

/// Returns the text content of a named child, when the child exists.
fn child_text(parent: &Element, name: &str) -> Option<String> {
    parent.get_child(name).map(element_text)
}

/// Returns the concatenated text content of an element.
fn element_text(element: &Element) -> String {
    element.get_text().map(|text| text.into_owned()).unwrap_or_default()
}
