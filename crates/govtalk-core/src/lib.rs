// crates/govtalk-core/src/lib.rs
// ============================================================================
// Module: GovTalk Core Library
// Description: Public API surface for the GovTalk envelope protocol engine.
// Purpose: Expose core types, interfaces, and the runtime client.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! GovTalk core builds, authenticates, and parses GovTalk v2.0 message
//! envelopes and drives the submit/acknowledge/poll lifecycle against a UK
//! government gateway. It is transport-agnostic and integrates through
//! explicit interfaces rather than embedding an HTTP client; see the
//! `govtalk-transport` crate for the blocking implementation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AcceptAllFunctions;
pub use interfaces::AlternativeAuthentication;
pub use interfaces::AuthenticationError;
pub use interfaces::AuthenticationToken;
pub use interfaces::DigestError;
pub use interfaces::FunctionError;
pub use interfaces::IdentityDigest;
pub use interfaces::MessageFunctionValidator;
pub use interfaces::PackageDigest;
pub use interfaces::SchemaGate;
pub use interfaces::SchemaGateError;
pub use interfaces::Transport;
pub use interfaces::TransportError;
pub use runtime::BuildError;
pub use runtime::GovTalkClient;
pub use runtime::ParseError;
pub use runtime::SendError;
pub use runtime::SendOutcome;
pub use runtime::StatusRecord;
pub use runtime::build_envelope;
pub use runtime::fresh_transaction_id;
pub use runtime::parse_envelope;
