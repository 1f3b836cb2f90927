//! Constant-time comparison of a stored API key against a supplied one.
//!
//! Both sides are hashed with SHA-256 first so the comparison always runs over
//! 32 bytes; neither the stored key's length nor a matching prefix can be
//! inferred from response timing.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Seam for the token path of identity resolution.
///
/// `supplied` is `None` when the request carried no `api_key`; implementations
/// must still perform the comparison and return `false`.
pub trait CredentialComparator: Send + Sync {
    fn matches(&self, stored: Option<&str>, supplied: Option<&str>) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SecureComparator;

impl CredentialComparator for SecureComparator {
    fn matches(&self, stored: Option<&str>, supplied: Option<&str>) -> bool {
        secure_compare(stored.unwrap_or_default(), supplied.unwrap_or_default())
    }
}

/// Returns `true` only when both secrets are non-empty and equal.
pub fn secure_compare(stored: &str, supplied: &str) -> bool {
    let stored_digest = Sha256::digest(stored.as_bytes());
    let supplied_digest = Sha256::digest(supplied.as_bytes());

    let equal: bool = stored_digest
        .as_slice()
        .ct_eq(supplied_digest.as_slice())
        .into();

    // Empty secrets never authenticate, even against each other.
    equal & !stored.is_empty() & !supplied.is_empty()
}
