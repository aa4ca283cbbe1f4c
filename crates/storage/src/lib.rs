//! In-memory cluster client for kvcompat
//!
//! This crate provides a reference implementation of the client contract:
//! - MemoryClient: multi-node record store with policy enforcement
//! - MemoryConnector: seed-host based connection
//! - apply: per-record operation execution (generation checks, bin ops)
//!
//! It backs the facade's tests and any embedding that wants a cluster
//! without a network.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod apply;
pub mod client;
pub mod connector;
pub mod node;
pub mod stored_record;

pub use client::{MemoryClient, RecordedPolicy, DEFAULT_MAX_RECORD_SIZE, DEFAULT_NODE_COUNT};
pub use connector::MemoryConnector;
pub use node::MemoryNode;
pub use stored_record::StoredRecord;
