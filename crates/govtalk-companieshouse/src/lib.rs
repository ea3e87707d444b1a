// crates/govtalk-companieshouse/src/lib.rs
// ============================================================================
// Module: GovTalk Companies House Extension
// Description: CHMD5 authentication and company search services.
// Purpose: Compose the core engine's seams into the CH XMLGW protocol.
// Dependencies: govtalk-core, hex, md-5, thiserror, url, xmltree
// ============================================================================

//! ## Overview
//! The Companies House XML Gateway layers two things on the generic
//! envelope: the CHMD5 alternative authentication derivation and
//! search-request bodies answered synchronously with CoSearchItem lists.
//! This crate supplies both, built on the core client's injection seams.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod search;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::ChMd5Authentication;
pub use search::CompaniesHouseError;
pub use search::CompaniesHouseService;
pub use search::CompanyMatch;
pub use search::CompanySearchResults;
pub use search::Dataset;
pub use search::GATEWAY_SCHEMA;
pub use search::GATEWAY_URL;
