// crates/govtalk-companieshouse/src/search.rs
// ============================================================================
// Module: Companies House Searches
// Description: Company name and number search services over the XML Gateway.
// Purpose: Build search bodies and parse CoSearchItem result lists.
// Dependencies: crate::auth, govtalk-core, thiserror, url, xmltree
// ============================================================================

//! ## Overview
//! The search service files `NameSearch` and `NumberSearch` requests against
//! the Companies House XML Gateway using CHMD5 authentication, and parses
//! the returned search items into exact and possible matches. Searches are
//! synchronous: the gateway answers with a terminal response, no polling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use govtalk_core::Credentials;
use govtalk_core::FieldError;
use govtalk_core::FunctionError;
use govtalk_core::GovTalkClient;
use govtalk_core::MessageBody;
use govtalk_core::ResponseErrors;
use govtalk_core::SendError;
use govtalk_core::SendOutcome;
use govtalk_core::Transport;
use govtalk_core::XmlFragment;
use thiserror::Error;
use url::Url;
use xmltree::Element;
use xmltree::XMLNode;

use crate::auth::ChMd5Authentication;

// ============================================================================
// SECTION: Wire Constants
// ============================================================================

/// Companies House XML Gateway endpoint.
pub const GATEWAY_URL: &str = "http://xmlgw.companieshouse.gov.uk/v1-0/xmlgw/Gateway";
/// Additional schema listed in the envelope schema-location hint.
pub const GATEWAY_SCHEMA: &str = "http://xmlgw.companieshouse.gov.uk/v1-1/schema/Egov_ch-v2-0.xsd";
/// Schema referenced by name search request bodies.
const NAME_SEARCH_SCHEMA: &str = "http://xmlgw.companieshouse.gov.uk/v1-0/schema/NameSearch.xsd";
/// Schema referenced by number search request bodies.
const NUMBER_SEARCH_SCHEMA: &str =
    "http://xmlgw.companieshouse.gov.uk/v1-0/schema/NumberSearch.xsd";

/// URI of this extension's channel route.
const EXTENSION_ROUTE_URI: &str = "https://crates.io/crates/govtalk-companieshouse";
/// Product name of this extension's channel route.
const EXTENSION_ROUTE_PRODUCT: &str = "govtalk-companieshouse";
/// Product version of this extension's channel route.
const EXTENSION_ROUTE_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// SECTION: Search Model
// ============================================================================

/// Dataset a search runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dataset {
    /// Live companies (default).
    #[default]
    Live,
    /// Dissolved companies.
    Dissolved,
    /// Former names.
    Former,
    /// Proposed names.
    Proposed,
}

impl Dataset {
    /// Returns the uppercase wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Dissolved => "DISSOLVED",
            Self::Former => "FORMER",
            Self::Proposed => "PROPOSED",
        }
    }
}

/// One company returned by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyMatch {
    /// Registered company name.
    pub name: String,
    /// Company number.
    pub number: String,
}

/// Parsed search results: every match, plus the one marked exact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanySearchResults {
    /// The match Companies House marked EXACT, when any.
    pub exact: Option<CompanyMatch>,
    /// Every returned match, in document order.
    pub matches: Vec<CompanyMatch>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures while searching the Companies House gateway.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CompaniesHouseError {
    /// The gateway URL failed to parse.
    #[error("service url is invalid: {0}")]
    InvalidEndpoint(String),
    /// Company name is empty or longer than 160 characters.
    #[error("company name must be non-empty and shorter than 161 characters")]
    InvalidCompanyName,
    /// Company number is not 1-8 characters of `A-Z0-9` plus an optional `*`.
    #[error("company number must be 1-8 characters of A-Z0-9 with an optional trailing *")]
    InvalidCompanyNumber,
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
// SECTION: Search Service
// ============================================================================

/// Companies House search service over a GovTalk client.
///
/// # Invariants
/// - Every request authenticates with CHMD5 and the `request` qualifier.
pub struct CompaniesHouseService<T> {
    /// Underlying envelope client.
    client: GovTalkClient<T>,
}

impl<T: Transport> CompaniesHouseService<T> {
    /// Creates a search service against the Companies House gateway.
    ///
    /// # Errors
    ///
    /// Returns [`CompaniesHouseError::InvalidEndpoint`] when the gateway or
    /// schema URL cannot be parsed, which indicates a broken build.
    pub fn new(
        sender_id: &str,
        password: &str,
        transport: T,
    ) -> Result<Self, CompaniesHouseError> {
        let server = Url::parse(GATEWAY_URL)
            .map_err(|error| CompaniesHouseError::InvalidEndpoint(error.to_string()))?;
        let schema = Url::parse(GATEWAY_SCHEMA)
            .map_err(|error| CompaniesHouseError::InvalidEndpoint(error.to_string()))?;
        let mut client =
            GovTalkClient::new(server, Credentials::new(sender_id, password), transport)
                .with_alternative_authentication(Box::new(ChMd5Authentication));
        client.set_schema_location(schema, Some(false));
        client.set_message_authentication("alternative")?;
        client.set_message_qualifier("request")?;
        Ok(Self {
            client,
        })
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

    /// Searches for companies by registered name.
    ///
    /// # Errors
    ///
    /// Returns [`CompaniesHouseError::InvalidCompanyName`] before any
    /// network call for a bad name, [`CompaniesHouseError::Gateway`] for
    /// classified gateway errors, or any exchange failure.
    pub fn company_name_search(
        &mut self,
        company_name: &str,
        dataset: Dataset,
    ) -> Result<CompanySearchResults, CompaniesHouseError> {
        if company_name.is_empty() || company_name.chars().count() > 160 {
            return Err(CompaniesHouseError::InvalidCompanyName);
        }
        let mut request = Element::new("NameSearchRequest");
        request
            .attributes
            .insert("xsi:noNamespaceSchemaLocation".to_string(), NAME_SEARCH_SCHEMA.to_string());
        push_leaf(&mut request, "CompanyName", company_name);
        push_leaf(&mut request, "DataSet", dataset.as_str());

        self.search("NameSearch", request)
    }

    /// Searches for companies by (partial) company number.
    ///
    /// # Errors
    ///
    /// Returns [`CompaniesHouseError::InvalidCompanyNumber`] before any
    /// network call for a bad number, [`CompaniesHouseError::Gateway`] for
    /// classified gateway errors, or any exchange failure.
    pub fn company_number_search(
        &mut self,
        company_number: &str,
        dataset: Dataset,
    ) -> Result<CompanySearchResults, CompaniesHouseError> {
        if !is_valid_company_number(company_number) {
            return Err(CompaniesHouseError::InvalidCompanyNumber);
        }
        let mut request = Element::new("NumberSearchRequest");
        request
            .attributes
            .insert("xsi:noNamespaceSchemaLocation".to_string(), NUMBER_SEARCH_SCHEMA.to_string());
        push_leaf(&mut request, "PartialCompanyNumber", company_number);
        push_leaf(&mut request, "DataSet", dataset.as_str());

        self.search("NumberSearch", request)
    }

    /// Sends one search request and parses the result list.
    fn search(
        &mut self,
        message_class: &str,
        body: Element,
    ) -> Result<CompanySearchResults, CompaniesHouseError> {
        self.client.set_message_class(message_class)?;
        self.client.clear_message_correlation_id();
        self.client.set_message_body(MessageBody::from(XmlFragment::from_element(body)));
        self.client.add_channel_route(
            EXTENSION_ROUTE_URI,
            Some(EXTENSION_ROUTE_PRODUCT.to_string()),
            Some(EXTENSION_ROUTE_VERSION.to_string()),
            Vec::new(),
            None,
            false,
        )?;

        match self.client.send_message()? {
            SendOutcome::Errored => {
                let errors = self
                    .client
                    .response_errors()
                    .cloned()
                    .unwrap_or_default();
                Err(CompaniesHouseError::Gateway(errors))
            }
            _ => self.parse_results(message_class),
        }
    }

    /// Parses the search result list below the named body element.
    fn parse_results(
        &self,
        message_class: &str,
    ) -> Result<CompanySearchResults, CompaniesHouseError> {
        let body = self
            .client
            .response()
            .ok_or_else(|| {
                CompaniesHouseError::UnexpectedResponse("no response available".to_string())
            })?
            .body_element()
            .map_err(|error| CompaniesHouseError::UnexpectedResponse(error.to_string()))?
            .ok_or_else(|| {
                CompaniesHouseError::UnexpectedResponse("response body is empty".to_string())
            })?;
        if body.name != message_class {
            return Err(CompaniesHouseError::UnexpectedResponse(format!(
                "expected {message_class}, got {}",
                body.name
            )));
        }

        let mut results = CompanySearchResults::default();
        for node in &body.children {
            let XMLNode::Element(item) = node else {
                continue;
            };
            if item.name != "CoSearchItem" {
                continue;
            }
            let company = CompanyMatch {
                name: child_text(item, "CompanyName").unwrap_or_default(),
                number: child_text(item, "CompanyNumber").unwrap_or_default(),
            };
            if child_text(item, "SearchMatch").as_deref() == Some("EXACT") {
                results.exact = Some(company.clone());
            }
            results.matches.push(company);
        }
        Ok(results)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Checks the company number form: 1-8 of `A-Z0-9`, optional trailing `*`.
fn is_valid_company_number(number: &str) -> bool {
    let body = number.strip_suffix('*').unwrap_or(number);
    !body.is_empty()
        && body.len() <= 8
        && body.bytes().all(|byte| byte.is_ascii_uppercase() || byte.is_ascii_digit())
}

/// Appends a leaf element with text content.
fn push_leaf(parent: &mut Element, name: &str, text: &str) {
    let mut leaf = Element::new(name);
    leaf.children.push(XMLNode::Text(text.to_string()));
    parent.children.push(XMLNode::Element(leaf));
}

/// Returns the text content of a named child, when the child exists.
fn child_text(parent: &Element, name: &str) -> Option<String> {
    parent.get_child(name).map(|child| {
        child.get_text().map(|text| text.into_owned()).unwrap_or_default()
    })
}
