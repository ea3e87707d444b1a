// crates/govtalk-hmrc/src/agent.rs
// ============================================================================
// Module: HMRC Agent Details
// Description: Agent company, address, and contact details for IRheader.
// Purpose: Model the Agent element emitted into HMRC return headers.
// Dependencies: xmltree
// ============================================================================

//! ## Overview
//! Returns filed through an agent carry the agent's company, address, and
//! primary contact inside IRheader. The country defaults to England when
//! not given, matching the paper-form convention.

// ============================================================================
// SECTION: Imports
// ============================================================================

use xmltree::Element;
use xmltree::XMLNode;

// ============================================================================
// SECTION: Agent Model
// ============================================================================

/// Agent company address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAddress {
    /// Address lines, in order.
    pub lines: Vec<String>,
    /// Postcode.
    pub postcode: String,
    /// Country; England when not specified.
    pub country: String,
}

impl AgentAddress {
    /// Creates an address, defaulting the country to England.
    #[must_use]
    pub fn new(lines: Vec<String>, postcode: impl Into<String>, country: Option<String>) -> Self {
        Self {
            lines,
            postcode: postcode.into(),
            country: country.unwrap_or_else(|| "England".to_string()),
        }
    }
}

/// Agent primary contact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentContactName {
    /// Title (Mr, Mrs, and so on).
    pub title: String,
    /// Forename.
    pub forename: String,
    /// Surname.
    pub surname: String,
}

/// Agent primary contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentContact {
    /// Contact name.
    pub name: AgentContactName,
    /// Email address, when given.
    pub email: Option<String>,
    /// Telephone number, when given.
    pub telephone: Option<String>,
    /// Fax number, when given.
    pub fax: Option<String>,
}

/// Details of the agent filing a return.
///
/// # Invariants
/// - Emitted into IRheader only when set on the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDetails {
    /// Agent company name.
    pub company: String,
    /// Agent company address.
    pub address: AgentAddress,
    /// Primary contact, when given.
    pub contact: Option<AgentContact>,
    /// Agent's own reference, when given.
    pub reference: Option<String>,
}

impl AgentDetails {
    /// Renders the `Agent` element for IRheader.
    #[must_use]
    pub fn to_element(&self) -> Element {
        let mut agent = Element::new("Agent");
        if let Some(reference) = self.reference.as_ref() {
            push_leaf(&mut agent, "AgentID", reference);
        }
        push_leaf(&mut agent, "Company", &self.company);

        let mut address = Element::new("Address");
        for line in &self.address.lines {
            push_leaf(&mut address, "Line", line);
        }
        push_leaf(&mut address, "PostCode", &self.address.postcode);
        push_leaf(&mut address, "Country", &self.address.country);
        agent.children.push(XMLNode::Element(address));

        if let Some(contact) = self.contact.as_ref() {
            let mut contact_element = Element::new("Contact");
            let mut name = Element::new("Name");
            push_leaf(&mut name, "Ttl", &contact.name.title);
            push_leaf(&mut name, "Fore", &contact.name.forename);
            push_leaf(&mut name, "Sur", &contact.name.surname);
            contact_element.children.push(XMLNode::Element(name));
            if let Some(email) = contact.email.as_ref() {
                push_leaf(&mut contact_element, "Email", email);
            }
            if let Some(telephone) = contact.telephone.as_ref() {
                push_leaf(&mut contact_element, "Telephone", telephone);
            }
            if let Some(fax) = contact.fax.as_ref() {
                push_leaf(&mut contact_element, "Fax", fax);
            }
            agent.children.push(XMLNode::Element(contact_element));
        }
        agent
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Appends a leaf element with text content.
fn push_leaf(parent: &mut Element, name: &str, text: &str) {
    let mut leaf = Element::new(name);
    leaf.children.push(XMLNode::Text(text.to_string()));
    parent.children.push(XMLNode::Element(leaf));
}
