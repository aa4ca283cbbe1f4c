//! In-memory cluster client
//!
//! `MemoryClient` implements [`RecordClient`] over a fixed set of simulated
//! nodes. Records are routed to a node by the first digest byte, as a
//! partition map would.
//!
//! # Test hooks
//!
//! - [`MemoryClient::fail_next`] queues errors returned by the next calls
//! - [`MemoryClient::corrupt`] marks a record as failing integrity checks
//! - [`MemoryClient::last_policy`] exposes the policy of the latest call

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use kvcompat_core::{
    BinMap, BinSelection, ClientError, ClientResult, GenerationPolicy, Key, NativeCode, Operation,
    Policy, Record, RecordClient, ScanCallback, ScanPolicy, ScanSummary, WritePolicy,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::apply;
use crate::node::{MemoryNode, RecordId};
use crate::stored_record::now_epoch_secs;

/// Default number of simulated nodes
pub const DEFAULT_NODE_COUNT: usize = 3;

/// Default maximum stored record size (1 MiB)
pub const DEFAULT_MAX_RECORD_SIZE: usize = 1024 * 1024;

/// Policy captured from the most recent call
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedPolicy {
    /// Read-side call (get, exists, batch)
    Read(Policy),
    /// Write-side call (operate, delete)
    Write(WritePolicy),
    /// Scan call
    Scan(ScanPolicy),
}

/// In-memory cluster client
#[derive(Debug)]
pub struct MemoryClient {
    nodes: Vec<MemoryNode>,
    connected: AtomicBool,
    max_record_size: usize,
    faults: Mutex<VecDeque<ClientError>>,
    last_policy: Mutex<Option<RecordedPolicy>>,
    calls: AtomicU64,
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_COUNT)
    }
}

impl MemoryClient {
    /// Create a connected client with `node_count` nodes (at least one)
    pub fn new(node_count: usize) -> Self {
        let nodes = (1..=node_count.max(1))
            .map(|i| MemoryNode::new(format!("node-{}", i)))
            .collect();
        MemoryClient {
            nodes,
            connected: AtomicBool::new(true),
            max_record_size: DEFAULT_MAX_RECORD_SIZE,
            faults: Mutex::new(VecDeque::new()),
            last_policy: Mutex::new(None),
            calls: AtomicU64::new(0),
        }
    }

    /// Override the maximum stored record size
    pub fn with_max_record_size(mut self, bytes: usize) -> Self {
        self.max_record_size = bytes;
        self
    }

    /// Queue an error for the next call. Errors are consumed in order.
    pub fn fail_next(&self, error: ClientError) {
        self.faults.lock().push_back(error);
    }

    /// Mark a stored record as corrupted. Returns whether it existed.
    pub fn corrupt(&self, key: &Key) -> bool {
        match self.node_for(key).records().get_mut(&record_id(key)) {
            Some(mut record) => {
                record.corrupted = true;
                true
            }
            None => false,
        }
    }

    /// Policy passed to the most recent call
    pub fn last_policy(&self) -> Option<RecordedPolicy> {
        self.last_policy.lock().clone()
    }

    /// Number of client calls issued so far
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Stored records across all nodes, expired ones included
    pub fn record_count(&self) -> usize {
        self.nodes.iter().map(MemoryNode::len).sum()
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    fn begin(&self, policy: RecordedPolicy) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_policy.lock() = Some(policy);
        if !self.connected.load(Ordering::SeqCst) {
            return Err(ClientError::new(
                NativeCode::ServerNotAvailable,
                "client is not connected",
            ));
        }
        match self.faults.lock().pop_front() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    fn node_for(&self, key: &Key) -> &MemoryNode {
        let index = key.digest.as_bytes()[0] as usize % self.nodes.len();
        &self.nodes[index]
    }

    fn node_named(&self, name: &str) -> ClientResult<&MemoryNode> {
        self.nodes
            .iter()
            .find(|node| node.name() == name)
            .ok_or_else(|| ClientError::new(NativeCode::InvalidNode, format!("unknown node {}", name)))
    }

    fn read_live(&self, key: &Key, bins: &BinSelection) -> ClientResult<Option<Record>> {
        let node = self.node_for(key);
        let Some(stored) = node.records().get(&record_id(key)) else {
            return Ok(None);
        };
        if stored.is_expired() {
            return Ok(None);
        }
        if stored.corrupted {
            return Err(ClientError::new(
                NativeCode::ParseError,
                format!("record {} failed integrity check", key),
            ));
        }
        Ok(Some(stored.to_record(bins)))
    }

    fn is_live(&self, key: &Key) -> bool {
        self.node_for(key)
            .records()
            .get(&record_id(key))
            .map(|stored| !stored.is_expired())
            .unwrap_or(false)
    }

    fn scan_one(
        &self,
        node: &MemoryNode,
        policy: &ScanPolicy,
        namespace: &str,
        set_name: &str,
        callback: &ScanCallback<'_>,
    ) -> ClientResult<ScanSummary> {
        let mut summary = ScanSummary::default();
        for (digest, record) in node.snapshot(namespace, set_name, now_epoch_secs()) {
            if record.corrupted {
                summary.data_corrupted = true;
                continue;
            }
            let bins = if policy.include_bin_data {
                record.bins
            } else {
                BinMap::new()
            };
            callback(
                namespace,
                &record.set_name,
                &digest,
                &bins,
                record.generation,
                record.expiration,
            )?;
            summary.records += 1;
        }
        Ok(summary)
    }
}

fn record_id(key: &Key) -> RecordId {
    (key.namespace.clone(), key.digest)
}

fn merge(results: Vec<ClientResult<ScanSummary>>) -> ClientResult<ScanSummary> {
    let mut total = ScanSummary::default();
    for result in results {
        let summary = result?;
        total.records += summary.records;
        total.data_corrupted |= summary.data_corrupted;
    }
    Ok(total)
}

impl RecordClient for MemoryClient {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn node_names(&self) -> Vec<String> {
        self.nodes.iter().map(|node| node.name().to_string()).collect()
    }

    fn get(&self, policy: &Policy, key: &Key, bins: &BinSelection) -> ClientResult<Option<Record>> {
        self.begin(RecordedPolicy::Read(policy.clone()))?;
        self.read_live(key, bins)
    }

    fn exists(&self, policy: &Policy, key: &Key) -> ClientResult<bool> {
        self.begin(RecordedPolicy::Read(policy.clone()))?;
        Ok(self.is_live(key))
    }

    fn delete(&self, policy: &WritePolicy, key: &Key) -> ClientResult<bool> {
        self.begin(RecordedPolicy::Write(policy.clone()))?;
        match self.node_for(key).records().entry(record_id(key)) {
            Entry::Occupied(entry) => {
                if entry.get().is_expired() {
                    entry.remove();
                    return Ok(false);
                }
                let stored = entry.get().generation;
                if policy.generation_policy == GenerationPolicy::ExpectGenEqual
                    && stored != policy.generation
                {
                    return Err(ClientError::new(
                        NativeCode::GenerationError,
                        format!(
                            "generation mismatch: expected {}, stored {}",
                            policy.generation, stored
                        ),
                    ));
                }
                entry.remove();
                Ok(true)
            }
            Entry::Vacant(_) => Ok(false),
        }
    }

    fn operate(&self, policy: &WritePolicy, key: &Key, operations: &[Operation]) -> ClientResult<Record> {
        self.begin(RecordedPolicy::Write(policy.clone()))?;
        let set_name = key.set_name.as_deref().unwrap_or_default();
        let has_writes = operations.iter().any(Operation::is_write);
        match self.node_for(key).records().entry(record_id(key)) {
            Entry::Occupied(mut entry) => {
                let existing = if entry.get().is_expired() {
                    None
                } else {
                    Some(entry.get())
                };
                if existing.map(|r| r.corrupted).unwrap_or(false) && !has_writes {
                    return Err(ClientError::new(
                        NativeCode::ParseError,
                        format!("record {} failed integrity check", key),
                    ));
                }
                let outcome =
                    apply::execute(existing, set_name, policy, operations, self.max_record_size)?;
                if let Some(state) = outcome.state {
                    entry.insert(state);
                }
                Ok(outcome.record)
            }
            Entry::Vacant(entry) => {
                let outcome =
                    apply::execute(None, set_name, policy, operations, self.max_record_size)?;
                if let Some(state) = outcome.state {
                    entry.insert(state);
                }
                Ok(outcome.record)
            }
        }
    }

    fn batch_get(
        &self,
        policy: &Policy,
        keys: &[Key],
        bins: &BinSelection,
    ) -> ClientResult<Vec<ClientResult<Option<Record>>>> {
        self.begin(RecordedPolicy::Read(policy.clone()))?;
        Ok(keys.iter().map(|key| self.read_live(key, bins)).collect())
    }

    fn batch_exists(&self, policy: &Policy, keys: &[Key]) -> ClientResult<Vec<bool>> {
        self.begin(RecordedPolicy::Read(policy.clone()))?;
        Ok(keys.iter().map(|key| self.is_live(key)).collect())
    }

    fn scan_all(
        &self,
        policy: &ScanPolicy,
        namespace: &str,
        set_name: &str,
        callback: &ScanCallback<'_>,
    ) -> ClientResult<ScanSummary> {
        self.begin(RecordedPolicy::Scan(policy.clone()))?;
        debug!(
            namespace,
            set_name,
            nodes = self.nodes.len(),
            concurrent = policy.concurrent_nodes,
            "scan started"
        );
        // Membership is static here, so fail_on_cluster_change never fires
        let results = if policy.concurrent_nodes {
            std::thread::scope(|scope| {
                let handles: Vec<_> = self
                    .nodes
                    .iter()
                    .map(|node| {
                        scope.spawn(move || self.scan_one(node, policy, namespace, set_name, callback))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| {
                        handle.join().unwrap_or_else(|_| {
                            Err(ClientError::new(NativeCode::ServerError, "scan worker panicked"))
                        })
                    })
                    .collect::<Vec<_>>()
            })
        } else {
            let mut results = Vec::with_capacity(self.nodes.len());
            for node in &self.nodes {
                let result = self.scan_one(node, policy, namespace, set_name, callback);
                let failed = result.is_err();
                results.push(result);
                if failed {
                    break;
                }
            }
            results
        };
        merge(results)
    }

    fn scan_node(
        &self,
        policy: &ScanPolicy,
        node_name: &str,
        namespace: &str,
        set_name: &str,
        callback: &ScanCallback<'_>,
    ) -> ClientResult<ScanSummary> {
        self.begin(RecordedPolicy::Scan(policy.clone()))?;
        let node = self.node_named(node_name)?;
        debug!(node = node_name, namespace, set_name, "node scan started");
        self.scan_one(node, policy, namespace, set_name, callback)
    }

    fn close(&self) {
        self.set_connected(false);
    }
}
