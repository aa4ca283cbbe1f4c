//! Batch fan-out
//!
//! One client batch call for N references yields N results, positionally
//! aligned with the input. A per-record failure only affects its own slot.
//! A call-level failure is replicated into every slot so callers always
//! index the same way.

use kvcompat_core::{BinSelection, ClientError, Key, NativeCode, Policy, RecordClient};
use tracing::{debug, warn};

use crate::normalize;
use crate::result::OperationResult;

fn replicate(err: &ClientError, count: usize) -> Vec<OperationResult> {
    warn!(native = err.code, keys = count, "batch call failed");
    vec![normalize::from_error(err); count]
}

fn misaligned(expected: usize, got: usize) -> Vec<OperationResult> {
    let err = ClientError::new(
        NativeCode::ParseError,
        format!("batch returned {} results for {} keys", got, expected),
    );
    replicate(&err, expected)
}

/// Fetch many records in one client call
pub fn get(
    client: &dyn RecordClient,
    policy: &Policy,
    keys: &[Key],
    bins: &BinSelection,
) -> Vec<OperationResult> {
    if keys.is_empty() {
        return Vec::new();
    }
    debug!(keys = keys.len(), "batch get");
    match client.batch_get(policy, keys, bins) {
        Ok(records) if records.len() == keys.len() => records
            .into_iter()
            .map(normalize::from_read)
            .collect(),
        Ok(records) => misaligned(keys.len(), records.len()),
        Err(err) => replicate(&err, keys.len()),
    }
}

/// Check existence of many records in one client call
pub fn exists(client: &dyn RecordClient, policy: &Policy, keys: &[Key]) -> Vec<OperationResult> {
    if keys.is_empty() {
        return Vec::new();
    }
    debug!(keys = keys.len(), "batch exists");
    match client.batch_exists(policy, keys) {
        Ok(found) if found.len() == keys.len() => found
            .into_iter()
            .map(|present| normalize::from_found(Ok(present)))
            .collect(),
        Ok(found) => misaligned(keys.len(), found.len()),
        Err(err) => replicate(&err, keys.len()),
    }
}
