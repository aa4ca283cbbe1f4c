//! Cluster client contract
//!
//! [`RecordClient`] is the boundary between the compatibility layer and the
//! client that owns cluster topology, the wire protocol and retry execution.
//! Any implementation can be plugged in: a networked client, or the
//! in-memory one from `kvcompat-storage`.
//!
//! Thread safety: all methods may be called concurrently from multiple
//! threads (requires Send + Sync).

use std::sync::Arc;

use crate::error::ClientResult;
use crate::operation::{BinSelection, Operation};
use crate::policy::{Policy, ScanPolicy, WritePolicy};
use crate::types::{Digest, Host, Key, Record};
use crate::value::BinMap;

/// Per-record scan callback as delivered by the client.
///
/// Arguments: namespace, set, digest, bins, generation, expiration (epoch
/// seconds). Returning an error terminates the scan with that error. The
/// callback may be invoked from several threads at once when the scan runs
/// nodes concurrently.
pub type ScanCallback<'a> =
    dyn Fn(&str, &str, &Digest, &BinMap, u32, u32) -> ClientResult<()> + Sync + 'a;

/// Terminal status of a completed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanSummary {
    /// Records delivered to the callback
    pub records: u64,
    /// At least one record failed an integrity check and was skipped
    pub data_corrupted: bool,
}

/// Cluster client operations
pub trait RecordClient: Send + Sync {
    /// Whether the client currently has a live cluster connection
    fn is_connected(&self) -> bool;

    /// Names of the nodes currently in the cluster
    fn node_names(&self) -> Vec<String>;

    /// Read a record.
    ///
    /// Returns `Ok(None)` when the record does not exist.
    fn get(&self, policy: &Policy, key: &Key, bins: &BinSelection) -> ClientResult<Option<Record>>;

    /// Check record existence
    fn exists(&self, policy: &Policy, key: &Key) -> ClientResult<bool>;

    /// Delete a record. Returns whether it existed.
    fn delete(&self, policy: &WritePolicy, key: &Key) -> ClientResult<bool>;

    /// Apply writes then reads to one record in a single round trip.
    ///
    /// Returns the post-write record restricted to what the read operations
    /// asked for. Reading a missing record fails with `KeyNotFound`.
    fn operate(&self, policy: &WritePolicy, key: &Key, operations: &[Operation]) -> ClientResult<Record>;

    /// Read many records. Entry `i` of the result describes `keys[i]`.
    ///
    /// The outer error means the batch could not be issued at all. A failure
    /// on one record is reported in its own entry and leaves the others
    /// intact.
    fn batch_get(
        &self,
        policy: &Policy,
        keys: &[Key],
        bins: &BinSelection,
    ) -> ClientResult<Vec<ClientResult<Option<Record>>>>;

    /// Check existence of many records. Entry `i` describes `keys[i]`.
    fn batch_exists(&self, policy: &Policy, keys: &[Key]) -> ClientResult<Vec<bool>>;

    /// Scan a namespace/set across every node, blocking until done
    fn scan_all(
        &self,
        policy: &ScanPolicy,
        namespace: &str,
        set_name: &str,
        callback: &ScanCallback<'_>,
    ) -> ClientResult<ScanSummary>;

    /// Scan a namespace/set on one node, blocking until done
    fn scan_node(
        &self,
        policy: &ScanPolicy,
        node_name: &str,
        namespace: &str,
        set_name: &str,
        callback: &ScanCallback<'_>,
    ) -> ClientResult<ScanSummary>;

    /// Release cluster resources
    fn close(&self);
}

/// Establishes a client from seed hosts
pub trait Connector {
    /// Connect to the cluster reachable through any of `hosts`
    fn connect(&self, hosts: &[Host]) -> ClientResult<Arc<dyn RecordClient>>;
}
