//! Scan callback bridge
//!
//! Legacy scan callbacks take a trailing user-data argument and return
//! nothing. The client callback takes no user data and returns a result.
//! The bridge closes over the user data and forwards each record
//! synchronously, in the order and on the thread the client delivers it.

use kvcompat_core::{BinMap, ClientResult, Digest, RecordClient, ScanPolicy, ScanSummary};
use tracing::debug;

use crate::normalize;
use crate::result::OperationResult;

/// Scan target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTarget<'a> {
    /// Every node of the cluster
    AllNodes,
    /// A single node by name
    Node(&'a str),
}

/// Run a scan, forwarding each record to a legacy callback.
///
/// Blocks until the client signals completion. The callback may run on
/// several threads at once when nodes are scanned concurrently.
pub fn run<U, F>(
    client: &dyn RecordClient,
    policy: &ScanPolicy,
    target: ScanTarget<'_>,
    namespace: &str,
    set_name: &str,
    callback: F,
    user_data: &U,
) -> OperationResult
where
    U: Sync + ?Sized,
    F: Fn(&str, &str, &Digest, &BinMap, u32, u32, &U) + Sync,
{
    let bridge = |ns: &str, set: &str, digest: &Digest, bins: &BinMap, generation: u32, expiration: u32| -> ClientResult<()> {
        callback(ns, set, digest, bins, generation, expiration, user_data);
        Ok(())
    };
    let outcome = match target {
        ScanTarget::AllNodes => client.scan_all(policy, namespace, set_name, &bridge),
        ScanTarget::Node(node) => client.scan_node(policy, node, namespace, set_name, &bridge),
    };
    from_summary(outcome)
}

/// Normalize a scan's terminal status
pub fn from_summary(outcome: ClientResult<ScanSummary>) -> OperationResult {
    match outcome {
        Ok(summary) => {
            debug!(records = summary.records, corrupted = summary.data_corrupted, "scan complete");
            OperationResult {
                data_corrupted: summary.data_corrupted,
                ..OperationResult::ok()
            }
        }
        Err(err) => normalize::from_error(&err),
    }
}
