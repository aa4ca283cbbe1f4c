//! Record reference construction
//!
//! Legacy callers address records either by (namespace, set, user key) or by
//! a digest computed earlier. Both forms produce a client `Key`; the user key
//! is hashed and then dropped.

use kvcompat_core::{Digest, Key, Value};

use crate::error::{CompatError, Result};

/// Build a reference from a user key
pub fn build_ref(namespace: &str, set_name: &str, user_key: &Value) -> Result<Key> {
    Ok(Key::new(namespace, set_name, user_key)?)
}

/// Build a reference from a digest without hashing.
///
/// A wrong digest silently addresses a different record.
pub fn build_ref_from_digest(namespace: &str, digest: &Digest) -> Key {
    Key::from_digest(namespace, *digest)
}

/// Build references for a collection of user keys, preserving order.
///
/// An absent collection is rejected; an empty one yields no references.
pub fn build_refs(namespace: &str, set_name: &str, user_keys: Option<&[Value]>) -> Result<Vec<Key>> {
    let user_keys = user_keys.ok_or(CompatError::MissingParameter("user keys"))?;
    user_keys
        .iter()
        .map(|user_key| build_ref(namespace, set_name, user_key))
        .collect()
}

/// Build references for a collection of digests, preserving order
pub fn build_refs_from_digests(namespace: &str, digests: Option<&[Digest]>) -> Result<Vec<Key>> {
    let digests = digests.ok_or(CompatError::MissingParameter("digests"))?;
    Ok(digests
        .iter()
        .map(|digest| build_ref_from_digest(namespace, digest))
        .collect())
}

/// Digest a user key within a set, locally
pub fn compute_digest(set_name: &str, user_key: &Value) -> Result<Digest> {
    Ok(Digest::compute(set_name, user_key)?)
}
