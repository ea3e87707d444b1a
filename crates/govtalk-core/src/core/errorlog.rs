// crates/govtalk-core/src/core/errorlog.rs
// ============================================================================
// Module: GovTalk Local Error Log
// Description: Append-only caller-visible log of local failures.
// Purpose: Record validation failures raised before any network activity.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The local error log is independent of the protocol-level error buckets:
//! it records failures that happen inside the client before (or instead of)
//! a network exchange, such as malformed field values. Entries are appended
//! with explicit timestamps supplied by the caller, never read from a clock
//! here, so replay stays deterministic.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Log Entries
// ============================================================================

/// One local error entry.
///
/// # Invariants
/// - `code` is defined by the recording operation, not globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    /// Unix epoch milliseconds when the entry was recorded.
    pub timestamp_millis: i64,
    /// Short error code defined by the recording operation.
    pub code: String,
    /// Descriptive message, when one helps.
    pub message: Option<String>,
    /// Name of the operation that recorded the entry.
    pub source_operation: Option<String>,
}

// ============================================================================
// SECTION: Error Log
// ============================================================================

/// Append-only log of local errors.
///
/// # Invariants
/// - Entries are never reordered; the only removal is a wholesale clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLog {
    /// Recorded entries in append order.
    entries: Vec<ErrorLogEntry>,
}

impl ErrorLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn append(&mut self, entry: ErrorLogEntry) {
        self.entries.push(entry);
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[ErrorLogEntry] {
        &self.entries
    }

    /// Returns the most recent entry, if any.
    #[must_use]
    pub fn last(&self) -> Option<&ErrorLogEntry> {
        self.entries.last()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
