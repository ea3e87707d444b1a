// crates/govtalk-hmrc/src/lib.rs
// ============================================================================
// Module: GovTalk HMRC Extension
// Description: HMRC-specific envelope extensions: IRmark, agents, VAT filing.
// Purpose: Compose the core engine's seams into the HMRC filing protocol.
// Dependencies: govtalk-core, base64, sha1, thiserror, url, xmltree
// ============================================================================

//! ## Overview
//! HMRC submissions layer two things on the generic envelope: an IRmark
//! integrity mark spliced into the body after serialization, and IRenvelope
//! bodies carrying IRheader metadata (keys, period, agent, sender capacity).
//! This crate supplies the IRmark digest hook, the agent model, and a VAT
//! declaration service driving the submit/acknowledge/poll lifecycle.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod agent;
pub mod irmark;
pub mod vat;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use agent::AgentAddress;
pub use agent::AgentContact;
pub use agent::AgentContactName;
pub use agent::AgentDetails;
pub use irmark::IRMARK_PLACEHOLDER;
pub use irmark::IrmarkDigest;
pub use irmark::compute_irmark;
pub use vat::VatAcceptance;
pub use vat::VatDeclaration;
pub use vat::VatError;
pub use vat::VatPaymentMethod;
pub use vat::VatPollOutcome;
pub use vat::VatReturnBoxes;
pub use vat::VatService;
pub use vat::VatServiceEndpoint;
pub use vat::VatSubmissionReceipt;
