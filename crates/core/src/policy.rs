//! Policy objects consumed by the cluster client
//!
//! These are the client's own knobs. The compatibility layer never
//! interprets them beyond building them; the client executes timeouts,
//! retries and server-side checks.

use std::time::Duration;

/// Base policy for every command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    /// Total transaction timeout; zero means no timeout
    pub timeout: Duration,
    /// Additional attempts after the first one
    pub max_retries: u32,
    /// Delay between attempts
    pub sleep_between_retries: Duration,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            timeout: Duration::ZERO,
            max_retries: 2,
            sleep_between_retries: Duration::from_millis(500),
        }
    }
}

/// Generation check applied to a write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationPolicy {
    /// No generation check
    #[default]
    None,
    /// Stored generation must equal the expected one
    ExpectGenEqual,
    /// Stored generation must be greater than or equal to the expected one
    ExpectGenGreaterOrEqual,
    /// Stored generation must equal the expected one; on mismatch the server
    /// keeps the write as a duplicate version instead of failing
    DuplicateOnMismatch,
}

/// How a write treats an existing record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordExistsAction {
    /// Create or update; merge written bins into existing ones
    #[default]
    Update,
    /// Update only; fail if the record does not exist
    UpdateOnly,
    /// Create or replace; bins not written are removed
    Replace,
    /// Replace only; fail if the record does not exist
    ReplaceOnly,
    /// Create only; fail if the record exists
    CreateOnly,
}

/// Policy for write commands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WritePolicy {
    /// Timeout and retry settings
    pub base: Policy,
    /// Existing-record handling
    pub record_exists_action: RecordExistsAction,
    /// Generation check mode
    pub generation_policy: GenerationPolicy,
    /// Expected generation for the check
    pub generation: u32,
    /// Record time-to-live in seconds; zero means never expire
    pub expiration: u32,
}

/// Server-side scan priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Server decides
    #[default]
    Default,
    /// Low priority
    Low,
    /// Medium priority
    Medium,
    /// High priority
    High,
}

/// Policy for scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPolicy {
    /// Timeout and retry settings
    pub base: Policy,
    /// Scan all nodes in parallel
    pub concurrent_nodes: bool,
    /// Worker threads per node (advisory)
    pub threads_per_node: u32,
    /// Server priority
    pub priority: Priority,
    /// Abort when cluster membership changes mid-scan
    pub fail_on_cluster_change: bool,
    /// Return bin data; false delivers digests and metadata only
    pub include_bin_data: bool,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        ScanPolicy {
            base: Policy::default(),
            concurrent_nodes: true,
            threads_per_node: 1,
            priority: Priority::Default,
            fail_on_cluster_change: false,
            include_bin_data: true,
        }
    }
}
