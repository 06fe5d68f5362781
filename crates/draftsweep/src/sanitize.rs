//! Helpers for sanitizing data before it enters log events and span attributes.
//!
//! Logs are safe to share for debugging: message ids and addresses are
//! reduced so they correlate without revealing who wrote to whom.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::identity::MessageIdentity;

/// Returns a short deterministic hash of an identifier.
pub fn short_id(value: &str) -> String {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Loggable form of a message identity: store kept, entry id hashed.
pub fn redact_identity(identity: &MessageIdentity) -> String {
    format!("{}/{}", identity.store_id, short_id(&identity.entry_id))
}

/// Masks the local part of an email address.
///
/// - `dana.lee@example.com` → `d***@example.com`
/// - `not-an-address` → `***`
pub fn redact_address(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        _ => "***".to_string(),
    }
}
