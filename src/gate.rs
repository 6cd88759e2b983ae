// ==============================================================================
// gate.rs - Authorization Header Classification
// ==============================================================================
// Description: Classify a request's Authorization header into an auth decision
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-23
// Version: 1.0.0
// ==============================================================================
//
// Security: Every parse failure becomes a decision value, never a panic, so a
// hostile Authorization header cannot take down the request pipeline. Store
// failures reject the request (fail closed). Secret comparison runs in time
// independent of where the first mismatching byte sits.
//
// ==============================================================================

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;

use crate::store::CredentialStore;

/// Outcome of classifying a single request's `Authorization` header
///
/// All four outcomes are terminal; there is no retry or multi-step
/// negotiation within a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    /// No `Authorization` header was present
    Anonymous,

    /// A header was present but could not be parsed as Basic credentials
    Malformed,

    /// Well-formed Basic credentials that did not match a known user
    Rejected { username: String },

    /// Well-formed Basic credentials matching the stored secret
    Authenticated { username: String },
}

/// Classify an `Authorization` header against a credential store
///
/// Parsing follows the Basic scheme: `<scheme> <base64(username:password)>`,
/// scheme matched case-insensitively, the credential pair split at the first
/// `:` so passwords may themselves contain colons. Anything that fails to
/// parse is [`AuthDecision::Malformed`]; credentials that parse but do not
/// match are [`AuthDecision::Rejected`].
///
/// Evaluation is pure and idempotent: the same header and store contents
/// always produce the same decision.
pub fn evaluate(header: Option<&str>, store: &dyn CredentialStore) -> AuthDecision {
    let header = match header {
        Some(value) => value,
        None => return AuthDecision::Anonymous,
    };

    // Scheme and payload are separated by the first whitespace run
    let trimmed = header.trim_start();
    let (scheme, rest) = match trimmed.split_once(|c: char| c.is_whitespace()) {
        Some(parts) => parts,
        None => return AuthDecision::Malformed,
    };

    if !scheme.eq_ignore_ascii_case("basic") {
        return AuthDecision::Malformed;
    }

    let decoded = match STANDARD.decode(rest.trim_start()) {
        Ok(bytes) => bytes,
        Err(_) => return AuthDecision::Malformed,
    };

    let decoded = match String::from_utf8(decoded) {
        Ok(text) => text,
        Err(_) => return AuthDecision::Malformed,
    };

    let (username, password) = match decoded.split_once(':') {
        Some(parts) => parts,
        None => return AuthDecision::Malformed,
    };

    match store.lookup(username) {
        Ok(Some(secret)) if constant_time_eq(secret.as_bytes(), password.as_bytes()) => {
            AuthDecision::Authenticated {
                username: username.to_string(),
            }
        }
        Ok(_) => AuthDecision::Rejected {
            username: username.to_string(),
        },
        Err(error) => {
            warn!("Credential lookup failed for {}: {:#}", username, error);
            AuthDecision::Rejected {
                username: username.to_string(),
            }
        }
    }
}

/// Byte-exact equality whose timing depends only on the input lengths
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

// ==============================================================================
// TESTS
// ==============================================================================
