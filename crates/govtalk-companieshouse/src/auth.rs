// crates/govtalk-companieshouse/src/auth.rs
// ============================================================================
// Module: Companies House Authentication
// Description: CHMD5 alternative authentication derivation.
// Purpose: Implement the core AlternativeAuthentication seam for CH XMLGW.
// Dependencies: govtalk-core, hex, md-5
// ============================================================================

//! ## Overview
//! The Companies House XML Gateway authenticates with a CHMD5 token: the
//! lowercase hex MD5 of the sender id, password, and per-send transaction id
//! concatenated. This is the concrete derivation behind the engine's
//! `alternative` authentication method; other agencies supply their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use govtalk_core::AlternativeAuthentication;
use govtalk_core::AuthenticationError;
use govtalk_core::AuthenticationToken;
use govtalk_core::TransactionId;
use md5::Digest;
use md5::Md5;

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// CHMD5 token derivation for the Companies House XML Gateway.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChMd5Authentication;

impl ChMd5Authentication {
    /// Computes the CHMD5 token for one transaction.
    #[must_use]
    pub fn token(sender_id: &str, password: &str, transaction: &TransactionId) -> String {
        let mut hasher = Md5::new();
        hasher.update(sender_id.as_bytes());
        hasher.update(password.as_bytes());
        hasher.update(transaction.as_str().as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl AlternativeAuthentication for ChMd5Authentication {
    fn derive(
        &self,
        sender_id: &str,
        password: &str,
        transaction: &TransactionId,
    ) -> Result<AuthenticationToken, AuthenticationError> {
        Ok(AuthenticationToken {
            method: "CHMD5".to_string(),
            value: Self::token(sender_id, password, transaction),
        })
    }
}
