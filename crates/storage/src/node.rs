//! Simulated cluster node
//!
//! Each node owns the records whose digest maps to it. Records live in a
//! DashMap keyed by (namespace, digest): lock-free reads, and writes only
//! lock the target shard.

use dashmap::DashMap;
use kvcompat_core::Digest;

use crate::stored_record::StoredRecord;

/// Record identity inside a node
pub type RecordId = (String, Digest);

/// One node of the in-memory cluster
#[derive(Debug)]
pub struct MemoryNode {
    name: String,
    records: DashMap<RecordId, StoredRecord>,
}

impl MemoryNode {
    /// Create an empty node
    pub fn new(name: impl Into<String>) -> Self {
        MemoryNode {
            name: name.into(),
            records: DashMap::new(),
        }
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record map
    pub fn records(&self) -> &DashMap<RecordId, StoredRecord> {
        &self.records
    }

    /// Copy out the live records of a namespace/set.
    ///
    /// An empty `set_name` selects every set. Scans iterate the copy so
    /// callbacks may write back into the cluster without deadlocking.
    pub fn snapshot(&self, namespace: &str, set_name: &str, now: u32) -> Vec<(Digest, StoredRecord)> {
        self.records
            .iter()
            .filter(|entry| {
                let (ns, _) = entry.key();
                let record = entry.value();
                ns == namespace
                    && (set_name.is_empty() || record.set_name == set_name)
                    && !record.is_expired_at(now)
            })
            .map(|entry| (entry.key().1, entry.value().clone()))
            .collect()
    }

    /// Number of stored records, expired ones included
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the node stores nothing
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
