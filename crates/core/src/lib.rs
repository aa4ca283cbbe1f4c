//! Core types and traits for kvcompat
//!
//! This crate defines the foundational types shared by the compatibility
//! facade and cluster client implementations:
//! - Value / BinMap: dynamically-typed bin payloads
//! - Digest / Key: record addressing
//! - Bin / Record / Host: payload and metadata carriers
//! - Policy / WritePolicy / ScanPolicy: client policy objects
//! - Operation / BinSelection: per-record command building blocks
//! - ClientError / NativeCode: the client's error space
//! - RecordClient / Connector: the client contract

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod operation;
pub mod policy;
pub mod traits;
pub mod types;
pub mod value;

pub use error::{ClientError, ClientResult, Error, NativeCode, Result};
pub use operation::{BinSelection, Operation};
pub use policy::{GenerationPolicy, Policy, Priority, RecordExistsAction, ScanPolicy, WritePolicy};
pub use traits::{Connector, RecordClient, ScanCallback, ScanSummary};
pub use types::{Bin, Digest, Host, Key, Record, DIGEST_SIZE};
pub use value::{BinMap, Value};
