// crates/govtalk-transport/src/lib.rs
// ============================================================================
// Module: GovTalk Transport
// Description: Blocking HTTP transport and schema gate implementations.
// Purpose: Provide the network half of the envelope engine's seams.
// Dependencies: govtalk-core, reqwest, serde, url, xmltree
// ============================================================================

//! ## Overview
//! This crate ships the blocking implementations of the core transport and
//! schema-gate seams. The transport performs exactly one bounded HTTP POST
//! per envelope exchange; the schema gate probes the additional schema
//! location for reachability and checks document well-formedness. Both fail
//! closed on limits and policy violations.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;
pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::HttpTransport;
pub use http::HttpTransportConfig;
pub use schema::ReachabilitySchemaGate;
pub use schema::SchemaGateConfig;
