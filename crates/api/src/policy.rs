//! Option-to-policy translation
//!
//! Legacy callers supply a single timeout and a retry flag. The client wants
//! a timeout, a retry count and a sleep between retries. The arithmetic:
//!
//! | options          | timeout | retries            | sleep                          |
//! |------------------|---------|--------------------|--------------------------------|
//! | absent           | 5000 ms | 2                  | 5000 / 3 = 1666 ms             |
//! | one-shot         | tx      | 0                  | 0                              |
//! | retry            | tx      | client default (2) | tx / (retries + 1), max 2000 ms |
//!
//! The absent branch is not capped. Both the arithmetic and the asymmetry are
//! relied upon by existing callers.
//!
//! Write conditions are resolved by fixed precedence, first match wins:
//! unique-only, expect-equal, expect-greater-or-equal, keep-duplicate.

use std::time::Duration;

use kvcompat_core::{
    GenerationPolicy, Policy, Priority, RecordExistsAction, ScanPolicy, WritePolicy,
};

use crate::options::{
    GenerationMode, RetryMode, ScanOptions, ScanPriority, TransactionOptions, WriteOptions,
    DEFAULT_TIMEOUT_MS,
};

/// Upper bound on the sleep between retries in the retry branch
pub const MAX_RETRY_SLEEP_MS: u64 = 2000;

/// Retry count used when no options are given
pub const ABSENT_MAX_RETRIES: u32 = 2;

/// Translate transaction options into a read policy
pub fn to_policy(tx: Option<&TransactionOptions>) -> Policy {
    let Some(tx) = tx else {
        let timeout = u64::from(DEFAULT_TIMEOUT_MS);
        return Policy {
            timeout: Duration::from_millis(timeout),
            max_retries: ABSENT_MAX_RETRIES,
            sleep_between_retries: Duration::from_millis(timeout / u64::from(ABSENT_MAX_RETRIES + 1)),
        };
    };

    let timeout = u64::from(tx.timeout_ms);
    match tx.retry_mode {
        RetryMode::OneShot => Policy {
            timeout: Duration::from_millis(timeout),
            max_retries: 0,
            sleep_between_retries: Duration::ZERO,
        },
        RetryMode::Retry => {
            let max_retries = Policy::default().max_retries;
            let sleep = (timeout / (u64::from(max_retries) + 1)).min(MAX_RETRY_SLEEP_MS);
            Policy {
                timeout: Duration::from_millis(timeout),
                max_retries,
                sleep_between_retries: Duration::from_millis(sleep),
            }
        }
    }
}

/// Translate transaction and write options into a write policy
pub fn to_write_policy(tx: Option<&TransactionOptions>, write: Option<&WriteOptions>) -> WritePolicy {
    let mut policy = WritePolicy {
        base: to_policy(tx),
        ..WritePolicy::default()
    };
    let Some(write) = write else {
        return policy;
    };

    policy.expiration = write.expiration_secs;
    if write.unique_only {
        policy.record_exists_action = RecordExistsAction::CreateOnly;
        return policy;
    }
    let (generation_policy, generation) = match write.generation_mode() {
        GenerationMode::ExpectEqual(g) => (GenerationPolicy::ExpectGenEqual, g),
        GenerationMode::ExpectGreaterOrEqual(g) => (GenerationPolicy::ExpectGenGreaterOrEqual, g),
        GenerationMode::OnMismatchKeepDuplicate(g) => (GenerationPolicy::DuplicateOnMismatch, g),
        GenerationMode::None => (GenerationPolicy::None, 0),
    };
    policy.generation_policy = generation_policy;
    policy.generation = generation;
    policy
}

/// Translate scan options into a scan policy
pub fn to_scan_policy(scan: Option<&ScanOptions>) -> ScanPolicy {
    let Some(scan) = scan else {
        return ScanPolicy::default();
    };
    ScanPolicy {
        base: Policy::default(),
        concurrent_nodes: scan.concurrent_nodes,
        threads_per_node: scan.threads_per_node,
        priority: match scan.priority {
            ScanPriority::Auto => Priority::Default,
            ScanPriority::Low => Priority::Low,
            ScanPriority::Medium => Priority::Medium,
            ScanPriority::High => Priority::High,
        },
        fail_on_cluster_change: scan.fail_on_cluster_change,
        include_bin_data: scan.include_bin_data,
    }
}
