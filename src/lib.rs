//! kvcompat - Legacy request surface for a modern key-value cluster client
//!
//! kvcompat keeps applications written against the old single-timeout,
//! flat-bin, digest-addressed API working on top of a modern client.
//!
//! # Quick Start
//!
//! ```ignore
//! use kvcompat::{build_ref, CompatClient, MemoryClient, MemoryConnector, WriteOptions};
//!
//! let memory = Arc::new(MemoryClient::default());
//! let client = CompatClient::connect(MemoryConnector::localhost(memory), &hosts);
//!
//! let key = build_ref("test", "counters", &"hits".into())?;
//! client.add_bin(&key, "count", 1, None, None);
//! let result = client.get(&key, "count", None);
//! ```
//!
//! # Architecture
//!
//! The facade ([`CompatClient`]) talks to any [`RecordClient`]. The
//! in-memory [`MemoryClient`] implements the contract for embedding and
//! tests; a networked client plugs in the same way.

pub use kvcompat_api::*;
pub use kvcompat_core::{
    Bin, BinMap, ClientError, Connector, Digest, Host, Key, NativeCode, RecordClient, Value,
};
pub use kvcompat_storage::{MemoryClient, MemoryConnector, RecordedPolicy};
