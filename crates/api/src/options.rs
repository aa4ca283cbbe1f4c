//! Legacy per-call option objects
//!
//! These are plain values built by callers and handed to every facade call.
//! The policy module turns them into client policies.

use serde::{Deserialize, Serialize};

/// Default transaction timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u32 = 5000;

/// Retry behavior of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryMode {
    /// Let the client retry within the timeout
    #[default]
    Retry,
    /// Single attempt, no retries
    OneShot,
}

/// Timeout and retry options for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOptions {
    /// Total timeout in milliseconds, 0 = none
    pub timeout_ms: u32,
    /// Retry behavior
    pub retry_mode: RetryMode,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        TransactionOptions {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_mode: RetryMode::Retry,
        }
    }
}

impl TransactionOptions {
    /// Create default options (5000 ms, retry)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Disable retries
    pub fn one_shot(mut self) -> Self {
        self.retry_mode = RetryMode::OneShot;
        self
    }

    /// Set the retry mode
    pub fn with_retry_mode(mut self, mode: RetryMode) -> Self {
        self.retry_mode = mode;
        self
    }
}

/// Optimistic concurrency mode of a write.
///
/// Variants are listed from highest to lowest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GenerationMode {
    /// Write only if the stored generation equals the given one
    ExpectEqual(u32),
    /// Write only if the stored generation is at least the given one
    ExpectGreaterOrEqual(u32),
    /// On generation mismatch keep both versions as duplicates
    OnMismatchKeepDuplicate(u32),
    /// No generation check
    #[default]
    None,
}

impl GenerationMode {
    fn precedence(&self) -> u8 {
        match self {
            GenerationMode::ExpectEqual(_) => 3,
            GenerationMode::ExpectGreaterOrEqual(_) => 2,
            GenerationMode::OnMismatchKeepDuplicate(_) => 1,
            GenerationMode::None => 0,
        }
    }

    /// Expected generation, if any
    pub fn generation(&self) -> Option<u32> {
        match *self {
            GenerationMode::ExpectEqual(g)
            | GenerationMode::ExpectGreaterOrEqual(g)
            | GenerationMode::OnMismatchKeepDuplicate(g) => Some(g),
            GenerationMode::None => None,
        }
    }

    fn with_generation(self, generation: u32) -> Self {
        match self {
            GenerationMode::ExpectEqual(_) => GenerationMode::ExpectEqual(generation),
            GenerationMode::ExpectGreaterOrEqual(_) => GenerationMode::ExpectGreaterOrEqual(generation),
            GenerationMode::OnMismatchKeepDuplicate(_) => {
                GenerationMode::OnMismatchKeepDuplicate(generation)
            }
            GenerationMode::None => GenerationMode::None,
        }
    }
}

/// Write options for one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Time-to-live in seconds, 0 = never expire
    pub expiration_secs: u32,
    /// Fail if the record already exists
    pub unique_only: bool,
    generation_mode: GenerationMode,
}

impl WriteOptions {
    /// Create default options (unconditional write, no expiration)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live
    pub fn with_expiration(mut self, secs: u32) -> Self {
        self.expiration_secs = secs;
        self
    }

    /// Only create, never overwrite
    pub fn unique(mut self) -> Self {
        self.unique_only = true;
        self
    }

    /// Require the stored generation to equal `generation`
    pub fn expect_generation(self, generation: u32) -> Self {
        self.with_generation_mode(GenerationMode::ExpectEqual(generation))
    }

    /// Require the stored generation to be at least `generation`
    pub fn expect_generation_at_least(self, generation: u32) -> Self {
        self.with_generation_mode(GenerationMode::ExpectGreaterOrEqual(generation))
    }

    /// Keep both versions when the stored generation differs
    pub fn keep_duplicate_on_mismatch(self, generation: u32) -> Self {
        self.with_generation_mode(GenerationMode::OnMismatchKeepDuplicate(generation))
    }

    /// Request a generation mode.
    ///
    /// The honored mode never drops to a lower precedence: requesting a
    /// weaker mode keeps the current one and only updates the expected
    /// generation, which is shared between modes.
    pub fn with_generation_mode(mut self, mode: GenerationMode) -> Self {
        self.generation_mode = if mode.precedence() >= self.generation_mode.precedence() {
            mode
        } else {
            match mode.generation() {
                Some(g) => self.generation_mode.with_generation(g),
                None => self.generation_mode,
            }
        };
        self
    }

    /// Drop any generation check
    pub fn clear_generation_mode(mut self) -> Self {
        self.generation_mode = GenerationMode::None;
        self
    }

    /// The generation mode that will be honored
    pub fn generation_mode(&self) -> GenerationMode {
        self.generation_mode
    }
}

/// Scan scheduling priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPriority {
    /// Let the server decide
    #[default]
    Auto,
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

/// Scan options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Scan all nodes in parallel
    pub concurrent_nodes: bool,
    /// Advisory per-node thread count
    pub threads_per_node: u32,
    /// Scheduling priority
    pub priority: ScanPriority,
    /// Abort if cluster membership changes during the scan
    pub fail_on_cluster_change: bool,
    /// Deliver bins; false delivers digests and metadata only
    pub include_bin_data: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            concurrent_nodes: true,
            threads_per_node: 1,
            priority: ScanPriority::Auto,
            fail_on_cluster_change: false,
            include_bin_data: true,
        }
    }
}

impl ScanOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan nodes one after another
    pub fn sequential(mut self) -> Self {
        self.concurrent_nodes = false;
        self
    }

    /// Set the advisory per-node thread count
    pub fn with_threads_per_node(mut self, threads: u32) -> Self {
        self.threads_per_node = threads;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: ScanPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Abort on cluster membership change
    pub fn fail_on_cluster_change(mut self) -> Self {
        self.fail_on_cluster_change = true;
        self
    }

    /// Deliver digests and metadata only
    pub fn digests_only(mut self) -> Self {
        self.include_bin_data = false;
        self
    }
}
