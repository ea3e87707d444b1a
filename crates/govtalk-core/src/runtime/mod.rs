// crates/govtalk-core/src/runtime/mod.rs
// ============================================================================
// Module: GovTalk Runtime
// Description: Envelope builder, response parser, transaction ids, client.
// Purpose: Execute the single-exchange send/poll state machine.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime is the canonical execution path for one envelope exchange:
//! build, digest, gate, transmit, parse, classify. The client re-enters this
//! path fresh on every send and retains nothing beyond the single last
//! response.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod builder;
pub mod client;
pub mod parser;
pub mod transaction;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use builder::BuildError;
pub use builder::ENGINE_ROUTE_PRODUCT;
pub use builder::ENGINE_ROUTE_URI;
pub use builder::ENGINE_ROUTE_VERSION;
pub use builder::ENVELOPE_NAMESPACE;
pub use builder::ENVELOPE_SCHEMA;
pub use builder::ENVELOPE_VERSION;
pub use builder::build_envelope;
pub use client::GovTalkClient;
pub use client::SendError;
pub use client::SendOutcome;
pub use client::StatusRecord;
pub use parser::ParseError;
pub use parser::parse_envelope;
pub use transaction::fresh_transaction_id;
