// crates/govtalk-core/src/core/mod.rs
// ============================================================================
// Module: GovTalk Core Types
// Description: Canonical envelope field, request, response, and log types.
// Purpose: Provide validated, stable types for the envelope protocol engine.
// Dependencies: serde, thiserror, time, url, xmltree
// ============================================================================

//! ## Overview
//! GovTalk core types model the outbound envelope request, the parsed inbound
//! response, and the local error log. These types are the canonical source of
//! truth for the runtime engine and for agency extension crates.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod body;
pub mod errorlog;
pub mod message;
pub mod request;
pub mod response;
pub mod routing;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use body::BodyError;
pub use body::FragmentNode;
pub use body::MessageBody;
pub use body::XmlFragment;
pub use errorlog::ErrorLog;
pub use errorlog::ErrorLogEntry;
pub use message::AuthenticationMethod;
pub use message::CorrelationId;
pub use message::Credentials;
pub use message::FieldError;
pub use message::MessageClass;
pub use message::MessageFunction;
pub use message::MessageQualifier;
pub use message::SenderEmail;
pub use message::TransactionId;
pub use message::Transformation;
pub use request::EnvelopeRequest;
pub use request::RequiredField;
pub use response::ERROR_TYPE_BUSINESS;
pub use response::ERROR_TYPE_FATAL;
pub use response::ERROR_TYPE_RECOVERABLE;
pub use response::ERROR_TYPE_WARNING;
pub use response::EnvelopeResponse;
pub use response::GovTalkErrorDetail;
pub use response::ResponseEndpoint;
pub use response::ResponseErrors;
pub use routing::ChannelRoute;
pub use routing::ChannelRouteId;
pub use routing::ChannelRoutes;
pub use routing::MessageKey;
pub use routing::MessageKeys;
pub use routing::TargetOrganisation;
pub use routing::TargetOrganisations;
