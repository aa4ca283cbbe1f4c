//! Storage-layer record wrapper with expiration support
//!
//! The contract type `Record` is what callers see. `StoredRecord` adds the
//! storage concerns: owning set name, absolute expiry and the list of
//! duplicate versions kept by mismatched generation-checked writes.

use chrono::Utc;
use kvcompat_core::{BinMap, BinSelection, Record};

/// Current time in epoch seconds, saturated into `u32`
pub fn now_epoch_secs() -> u32 {
    Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32
}

/// Absolute expiry for a time-to-live; zero ttl means never
pub fn expiry_from_ttl(ttl_secs: u32) -> u32 {
    if ttl_secs == 0 {
        0
    } else {
        now_epoch_secs().saturating_add(ttl_secs)
    }
}

/// A stored record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StoredRecord {
    /// Set the record was written under
    pub set_name: String,
    /// Current bins
    pub bins: BinMap,
    /// Modification counter, starts at 1 on create
    pub generation: u32,
    /// Absolute expiry in epoch seconds, 0 = never
    pub expiration: u32,
    /// Conflicting versions preserved on generation mismatch
    pub duplicates: Vec<BinMap>,
    /// Failed an integrity check; unreadable until rewritten
    pub corrupted: bool,
}

impl StoredRecord {
    /// Create an empty record in a set, generation 0 (not yet written)
    pub fn empty(set_name: impl Into<String>) -> Self {
        StoredRecord {
            set_name: set_name.into(),
            ..Default::default()
        }
    }

    /// Check if this record has expired at `now`
    pub fn is_expired_at(&self, now: u32) -> bool {
        self.expiration != 0 && self.expiration <= now
    }

    /// Check if this record has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_epoch_secs())
    }

    /// Approximate stored size in bytes, duplicates included
    pub fn estimated_size(&self) -> usize {
        let bins = |map: &BinMap| -> usize {
            map.iter()
                .map(|(name, value)| name.len() + value.estimated_size())
                .sum()
        };
        bins(&self.bins) + self.duplicates.iter().map(bins).sum::<usize>()
    }

    /// Project to the contract type.
    ///
    /// When duplicate versions exist they are all returned, current version
    /// first, and `bins` holds the current version as well.
    pub fn to_record(&self, selection: &BinSelection) -> Record {
        let project = |map: &BinMap| -> BinMap {
            map.iter()
                .filter(|(name, _)| selection.includes(name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        };
        let bins = project(&self.bins);
        let duplicates = if self.duplicates.is_empty() {
            None
        } else {
            let mut versions = Vec::with_capacity(self.duplicates.len() + 1);
            versions.push(bins.clone());
            versions.extend(self.duplicates.iter().map(project));
            Some(versions)
        };
        Record {
            bins,
            generation: self.generation,
            expiration: self.expiration,
            duplicates,
        }
    }
}
