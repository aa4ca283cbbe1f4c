//! Addressing and record types
//!
//! This module defines:
//! - Digest: fixed-size record address derived from (set, user key)
//! - Key: namespace + digest reference handed to the cluster client
//! - Bin: named bin value
//! - Record: bins plus server metadata (generation, expiration, duplicates)
//! - Host: seed host address

use ripemd::{Digest as _, Ripemd160};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::value::{BinMap, Value};

/// Digest length in bytes
pub const DIGEST_SIZE: usize = 20;

/// Particle type tags hashed in front of the key bytes
const PARTICLE_INTEGER: u8 = 1;
const PARTICLE_STRING: u8 = 3;
const PARTICLE_BLOB: u8 = 4;

/// Canonical record address.
///
/// RIPEMD-160 over `set ‖ particle type ‖ key bytes`. The same (set, key)
/// pair always produces the same digest, independent of namespace.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }

    /// Build a digest from a slice, which must be exactly 20 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; DIGEST_SIZE] = bytes.try_into().map_err(|_| {
            Error::InvalidKey(format!(
                "digest must be {} bytes, got {}",
                DIGEST_SIZE,
                bytes.len()
            ))
        })?;
        Ok(Digest(array))
    }

    /// Compute the digest of a user key within a set.
    ///
    /// Accepts `Int`, `String` and `Bytes` keys. Any other variant,
    /// including `Null`, is rejected.
    pub fn compute(set_name: &str, user_key: &Value) -> Result<Self> {
        let mut hasher = Ripemd160::new();
        hasher.update(set_name.as_bytes());
        match user_key {
            Value::Int(i) => {
                hasher.update([PARTICLE_INTEGER]);
                hasher.update(i.to_be_bytes());
            }
            Value::String(s) => {
                hasher.update([PARTICLE_STRING]);
                hasher.update(s.as_bytes());
            }
            Value::Bytes(b) => {
                hasher.update([PARTICLE_BLOB]);
                hasher.update(b);
            }
            other => {
                return Err(Error::InvalidKey(format!(
                    "{} cannot be used as a user key",
                    other.type_name()
                )))
            }
        }
        let mut bytes = [0u8; DIGEST_SIZE];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(Digest(bytes))
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Record reference handed to the cluster client.
///
/// Identity is (namespace, digest). The set name is carried for routing and
/// diagnostics only; a key built from a digest has no set name and still
/// addresses the same record as the key it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Key {
    /// Namespace
    pub namespace: String,
    /// Set name, absent for digest-built keys
    pub set_name: Option<String>,
    /// Record address
    pub digest: Digest,
}

impl Key {
    /// Build a key by hashing `user_key` within `set_name`.
    ///
    /// The user key is not retained.
    pub fn new(namespace: impl Into<String>, set_name: impl Into<String>, user_key: &Value) -> Result<Self> {
        let set_name = set_name.into();
        let digest = Digest::compute(&set_name, user_key)?;
        Ok(Key {
            namespace: namespace.into(),
            set_name: Some(set_name),
            digest,
        })
    }

    /// Build a key directly from a digest, bypassing hashing
    pub fn from_digest(namespace: impl Into<String>, digest: Digest) -> Self {
        Key {
            namespace: namespace.into(),
            set_name: None,
            digest,
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.digest == other.digest
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.digest.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.set_name {
            Some(set) => write!(f, "{}:{}:{}", self.namespace, set, self.digest),
            None => write!(f, "{}::{}", self.namespace, self.digest),
        }
    }
}

/// Named bin value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Bin name; empty on single-bin namespaces
    pub name: String,
    /// Bin value
    pub value: Value,
}

impl Bin {
    /// Create a bin
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Bin {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Record as returned by the cluster client
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// Bin values; empty for header-only reads
    pub bins: BinMap,
    /// Server modification counter
    pub generation: u32,
    /// Expiration as epoch seconds, 0 = never
    pub expiration: u32,
    /// Conflicting unresolved versions, when the server kept them
    pub duplicates: Option<Vec<BinMap>>,
}

impl Record {
    /// Create a record without duplicates
    pub fn new(bins: BinMap, generation: u32, expiration: u32) -> Self {
        Record {
            bins,
            generation,
            expiration,
            duplicates: None,
        }
    }
}

/// Seed host address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Host {
    /// Host name or IP
    pub name: String,
    /// Service port
    pub port: u16,
}

impl Host {
    /// Create a host
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Host {
            name: name.into(),
            port,
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.port)
    }
}
