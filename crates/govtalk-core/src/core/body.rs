// crates/govtalk-core/src/core/body.rs
// ============================================================================
// Module: GovTalk Message Body
// Description: Opaque body payloads and the generic structure-to-XML mapping.
// Purpose: Give every body producer a single serialize capability.
// Dependencies: thiserror, xmltree
// ============================================================================

//! ## Overview
//! A message body is either raw pre-serialized XML text or a structured
//! fragment owned by a body producer. Components holding a body depend only
//! on its serialize capability, never on a concrete producer type. The
//! structured form includes the generic recursive mapping used by agency
//! extensions: named entries become elements, list entries repeat their
//! parent element name as siblings, and scalars become leaf elements.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;
use xmltree::Element;
use xmltree::EmitterConfig;
use xmltree::XMLNode;

// ============================================================================
// SECTION: Body Errors
// ============================================================================

/// Failures while serializing or embedding a message body.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    /// The body fragment could not be written as XML.
    #[error("body fragment could not be serialized: {0}")]
    Serialize(String),
    /// Raw body text is not well-formed XML.
    #[error("raw body text is not well-formed XML: {0}")]
    NotWellFormed(String),
}

// ============================================================================
// SECTION: Structured Values
// ============================================================================

/// One node of a structured body: scalar text, a named mapping, or a list.
///
/// # Invariants
/// - Mapping entries keep insertion order; it is the serialization order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    /// Scalar leaf content.
    Text(String),
    /// Named child entries, emitted as nested elements.
    Map(Vec<(String, FragmentNode)>),
    /// Index-based entries, emitted as repeated sibling elements that take
    /// their name from the parent entry.
    List(Vec<FragmentNode>),
}

impl FragmentNode {
    /// Creates a scalar node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Expands this node into sibling elements named `name`.
    ///
    /// Mapping nodes wrap their children in a single `name` element. List
    /// nodes emit no wrapping element: each entry expands directly into
    /// siblings that inherit `name`. Scalars become one leaf element.
    fn into_elements(self, name: &str) -> Vec<Element> {
        match self {
            Self::Text(value) => {
                let mut leaf = Element::new(name);
                leaf.children.push(XMLNode::Text(value));
                vec![leaf]
            }
            Self::Map(entries) => {
                let mut wrapper = Element::new(name);
                for (child_name, child) in entries {
                    for element in child.into_elements(&child_name) {
                        wrapper.children.push(XMLNode::Element(element));
                    }
                }
                vec![wrapper]
            }
            Self::List(entries) => {
                entries.into_iter().flat_map(|entry| entry.into_elements(name)).collect()
            }
        }
    }
}

// ============================================================================
// SECTION: Structured Fragments
// ============================================================================

/// A structured XML body fragment with a single root element.
#[derive(Debug, Clone)]
pub struct XmlFragment(Element);

impl XmlFragment {
    /// Wraps an existing element tree.
    #[must_use]
    pub const fn from_element(root: Element) -> Self {
        Self(root)
    }

    /// Builds a fragment from a structured node rooted at `name`.
    ///
    /// List nodes at the root still produce exactly one element: the first
    /// expansion is used and any surplus siblings are wrapped under `name`.
    #[must_use]
    pub fn from_structure(name: &str, node: FragmentNode) -> Self {
        let mut elements = node.into_elements(name);
        if elements.len() == 1 {
            if let Some(root) = elements.pop() {
                return Self(root);
            }
        }
        let mut wrapper = Element::new(name);
        for element in elements {
            wrapper.children.push(XMLNode::Element(element));
        }
        Self(wrapper)
    }

    /// Returns the root element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.0
    }

    /// Serializes the fragment without an XML declaration.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Serialize`] when the element tree cannot be
    /// written.
    pub fn serialize(&self) -> Result<String, BodyError> {
        write_element(&self.0)
    }
}

// ============================================================================
// SECTION: Message Body
// ============================================================================

/// An opaque message body supplied by a body-producer collaborator.
///
/// # Invariants
/// - Serialized content is embedded in the envelope verbatim, trimmed and
///   wrapped in newlines.
#[derive(Debug, Clone)]
pub enum MessageBody {
    /// Pre-serialized XML text (possibly empty, for delete/list requests).
    RawText(String),
    /// Structured fragment with a serialize capability.
    Fragment(XmlFragment),
}

impl MessageBody {
    /// Creates an empty body, as used by delete and list requests.
    #[must_use]
    pub const fn empty() -> Self {
        Self::RawText(String::new())
    }

    /// Returns true when serialization would produce no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::RawText(text) => text.trim().is_empty(),
            Self::Fragment(_) => false,
        }
    }

    /// Serializes the body to the text embedded between the `Body` tags.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError::Serialize`] when a structured fragment cannot be
    /// written.
    pub fn serialize(&self) -> Result<String, BodyError> {
        match self {
            Self::RawText(text) => Ok(text.trim().to_string()),
            Self::Fragment(fragment) => fragment.serialize(),
        }
    }
}

impl From<XmlFragment> for MessageBody {
    fn from(fragment: XmlFragment) -> Self {
        Self::Fragment(fragment)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes one element without indentation or an XML declaration.
pub(crate) fn write_element(element: &Element) -> Result<String, BodyError> {
    let config = EmitterConfig::new()
        .perform_indent(false)
        .write_document_declaration(false);
    let mut buffer = Vec::new();
    element
        .write_with_config(&mut buffer, config)
        .map_err(|error| BodyError::Serialize(error.to_string()))?;
    String::from_utf8(buffer).map_err(|error| BodyError::Serialize(error.to_string()))
}

/// Parses raw body text into nodes, tolerating multiple top-level siblings.
///
/// # Errors
///
/// Returns [`BodyError::NotWellFormed`] when the text is not well-formed XML.
pub(crate) fn parse_fragment(text: &str) -> Result<Vec<XMLNode>, BodyError> {
    let wrapped = format!("<fragment-root>{text}</fragment-root>");
    let parsed = Element::parse(wrapped.as_bytes())
        .map_err(|error| BodyError::NotWellFormed(error.to_string()))?;
    Ok(parsed.children)
}
