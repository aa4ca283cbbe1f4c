//! Shared test utilities for all integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from any test's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Arc;

pub use kvcompat::{
    build_ref, build_ref_from_digest, compute_digest, Bin, BinMap, CompatClient, Digest, Host,
    Key, MemoryClient, MemoryConnector, OperationResult, ResultCode, ScanOptions,
    TransactionOptions, Value, WriteOptions,
};

/// Namespace used by every suite
pub const NS: &str = "test";

/// Seed host the test connector accepts
pub fn seed() -> Host {
    Host::new("127.0.0.1", 3000)
}

// ============================================================================
// TestCluster - facade over an in-memory cluster
// ============================================================================

/// Facade connected to an in-memory cluster, with the cluster kept at hand
/// for fault injection and inspection.
pub struct TestCluster {
    pub memory: Arc<MemoryClient>,
    pub client: CompatClient,
}

impl TestCluster {
    /// Three-node cluster
    pub fn new() -> Self {
        Self::with_nodes(3)
    }

    /// Cluster with `nodes` nodes
    pub fn with_nodes(nodes: usize) -> Self {
        let memory = Arc::new(MemoryClient::new(nodes));
        let connector = MemoryConnector::localhost(memory.clone());
        let client = CompatClient::connect(connector, &[seed()]);
        assert!(client.is_connected(), "test cluster failed to connect");
        TestCluster { memory, client }
    }

    /// Reference for a string user key in `set`
    pub fn key(&self, set: &str, user_key: &str) -> Key {
        build_ref(NS, set, &Value::from(user_key)).expect("string keys are valid")
    }

    /// Reference for an integer user key in `set`
    pub fn int_key(&self, set: &str, user_key: i64) -> Key {
        build_ref(NS, set, &Value::Int(user_key)).expect("integer keys are valid")
    }

    /// Write `count` records `0..count` with bin `i` in `set`
    pub fn seed_ints(&self, set: &str, count: i64) {
        for i in 0..count {
            let r = self.client.set_bin(&self.int_key(set, i), "i", i, None, None);
            assert_ok(&r);
        }
    }
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert a result succeeded
pub fn assert_ok(result: &OperationResult) {
    assert_eq!(result.result_code, ResultCode::Ok, "unexpected result {:?}", result);
}

/// Assert a result failed with `code` and carries no bins
pub fn assert_code(result: &OperationResult, code: ResultCode) {
    assert_eq!(result.result_code, code, "unexpected result {:?}", result);
    if code != ResultCode::Ok && code != ResultCode::KeyNotFound {
        assert!(result.values_by_name.is_none());
    }
}
