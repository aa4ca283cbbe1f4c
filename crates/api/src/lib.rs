//! Legacy request-surface facade for kvcompat
//!
//! This crate re-exposes an older, simpler request surface on top of the
//! [`RecordClient`](kvcompat_core::RecordClient) contract:
//! - **options**: per-call option objects (timeout/retry, write conditions, scan)
//! - **policy**: option → client policy translation
//! - **address**: record references from user keys or digests
//! - **result / normalize**: fixed result codes and bin-map results
//! - **batch / scan**: positional batch fan-out, legacy scan callbacks
//! - **logging**: level + callback shim over `tracing`
//! - **config**: `kvcompat.toml`
//!
//! ## Call model
//!
//! Every facade call translates its options, issues exactly one client
//! call and normalizes the outcome. Client errors become result codes;
//! they are never returned as `Err`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kvcompat_api::{address, CompatClient, TransactionOptions};
//!
//! let client = CompatClient::connect(connector, &hosts);
//! let key = address::build_ref("test", "users", &"alice".into())?;
//! let result = client.set_bin(&key, "visits", 1, None, None);
//! assert_eq!(result.generation, Some(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod options;
pub mod policy;
pub mod result;
pub mod scan;

pub use address::{build_ref, build_ref_from_digest, build_refs, build_refs_from_digests, compute_digest};
pub use client::CompatClient;
pub use config::{CompatConfig, CONFIG_FILE_NAME};
pub use error::{CompatError, Result};
pub use logging::{
    clear_log_callback, configure_logging, set_log_callback, set_log_level, CompatLogLayer,
    LogCallback, LogLevel,
};
pub use options::{
    GenerationMode, RetryMode, ScanOptions, ScanPriority, TransactionOptions, WriteOptions,
};
pub use policy::{to_policy, to_scan_policy, to_write_policy};
pub use result::{OperationResult, ResultCode};
