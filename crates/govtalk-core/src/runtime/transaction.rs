// crates/govtalk-core/src/runtime/transaction.rs
// ============================================================================
// Module: GovTalk Transaction Identifiers
// Description: Per-send numeric transaction id generation.
// Purpose: Produce unique-enough ids from a wall-clock reading.
// Dependencies: crate::core::message
// ============================================================================

//! ## Overview
//! Although the envelope schema permits hex transaction ids, some gateways
//! only accept numeric ones, so ids are built from the wall clock: epoch
//! seconds concatenated with the zero-padded sub-second reading. One id is
//! generated per send and never reused; collisions at the expected call rate
//! (one per send) are not otherwise defended against.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::core::message::TransactionId;

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates a fresh numeric transaction id from the wall clock.
#[must_use]
pub fn fresh_transaction_id() -> TransactionId {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    TransactionId::from_clock_digits(format!("{}{:09}", now.as_secs(), now.subsec_nanos()))
}
