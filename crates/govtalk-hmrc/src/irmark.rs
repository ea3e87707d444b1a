// crates/govtalk-hmrc/src/irmark.rs
// ============================================================================
// Module: IRmark Package Digest
// Description: IRmark integrity mark computation and placeholder splicing.
// Purpose: Implement the core PackageDigest seam for HMRC submissions.
// Dependencies: govtalk-core, base64, sha1, xmltree
// ============================================================================

//! ## Overview
//! HMRC returns carry an IRmark: a digest over the envelope body, embedded
//! back into a placeholder the body builder left inside IRheader. The digest
//! runs once over the fully serialized envelope, so the mark covers the
//! exact body content that is transmitted. Packages without a placeholder
//! (polls, deletes) pass through unaltered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use govtalk_core::DigestError;
use govtalk_core::PackageDigest;
use sha1::Digest;
use sha1::Sha1;
use xmltree::Element;
use xmltree::EmitterConfig;
use xmltree::XMLNode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder text the body builder leaves inside the IRmark element.
pub const IRMARK_PLACEHOLDER: &str = "IRmark+Token";

// ============================================================================
// SECTION: Digest Implementation
// ============================================================================

/// IRmark digest hook for HMRC envelopes.
///
/// # Invariants
/// - Packages without the placeholder are returned unaltered.
/// - The mark is computed over the body with the IRmark element removed, so
///   verification can repeat the same reduction.
#[derive(Debug, Clone, Copy)]
pub struct IrmarkDigest {
    /// Whether mark generation is enabled.
    enabled: bool,
}

impl IrmarkDigest {
    /// Creates an enabled digest hook.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: true,
        }
    }

    /// Creates a digest hook with generation switched off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
        }
    }
}

impl Default for IrmarkDigest {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageDigest for IrmarkDigest {
    fn digest(&self, package: String) -> Result<String, DigestError> {
        if !self.enabled || !package.contains(IRMARK_PLACEHOLDER) {
            return Ok(package);
        }
        let mark = compute_irmark(&package)?;
        Ok(package.replace(IRMARK_PLACEHOLDER, &mark))
    }
}

// ============================================================================
// SECTION: Mark Computation
// ============================================================================

/// Computes the base64 IRmark over the package body.
///
/// # Errors
///
/// Returns [`DigestError`] when the package has no body or cannot be parsed.
pub fn compute_irmark(package: &str) -> Result<String, DigestError> {
    let envelope = Element::parse(package.as_bytes())
        .map_err(|error| DigestError::Digest(format!("package is not well-formed: {error}")))?;
    let body = envelope
        .get_child("Body")
        .ok_or_else(|| DigestError::Digest("package contains no Body element".to_string()))?;

    let mut reduced = body.clone();
    remove_irmark(&mut reduced);
    let canonical = canonical_bytes(&reduced)?;
    Ok(BASE64.encode(Sha1::digest(&canonical)))
}

/// Removes every IRmark element below the given element, at any depth.
fn remove_irmark(element: &mut Element) {
    element.children.retain(|node| {
        !matches!(node, XMLNode::Element(child) if child.name == "IRmark")
    });
    for node in &mut element.children {
        if let XMLNode::Element(child) = node {
            remove_irmark(child);
        }
    }
}

/// Serializes an element without indentation for digesting.
fn canonical_bytes(element: &Element) -> Result<Vec<u8>, DigestError> {
    let config = EmitterConfig::new()
        .perform_indent(false)
        .write_document_declaration(false);
    let mut buffer = Vec::new();
    element
        .write_with_config(&mut buffer, config)
        .map_err(|error| DigestError::Digest(format!("body serialization failed: {error}")))?;
    Ok(buffer)
}
