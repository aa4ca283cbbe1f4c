//! Compatibility client
//!
//! `CompatClient` exposes the legacy request surface. Every call follows the
//! same path:
//!
//! 1. translate options into a client policy
//! 2. issue exactly one client call
//! 3. normalize the outcome into an [`OperationResult`]
//!
//! Client errors never escape as `Err`. The only `Err` returns come from
//! reference construction over absent or invalid inputs.

use std::sync::Arc;

use kvcompat_core::{
    Bin, BinMap, BinSelection, ClientError, Connector, Digest, Host, Key, NativeCode, Operation,
    RecordClient, Value,
};
use tracing::{debug, info, warn};

use crate::address;
use crate::batch;
use crate::config::CompatConfig;
use crate::error::Result;
use crate::logging;
use crate::normalize;
use crate::options::{ScanOptions, TransactionOptions, WriteOptions};
use crate::policy::{to_policy, to_scan_policy, to_write_policy};
use crate::result::{OperationResult, ResultCode};
use crate::scan::{self, ScanTarget};

/// Legacy-surface client over a [`RecordClient`]
pub struct CompatClient {
    connector: Box<dyn Connector + Send + Sync>,
    hosts: Vec<Host>,
    client: Option<Arc<dyn RecordClient>>,
}

impl std::fmt::Debug for CompatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompatClient")
            .field("hosts", &self.hosts)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl CompatClient {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Connect through `connector` to the first reachable seed in `hosts`.
    ///
    /// An unreachable cluster does not fail construction: the client starts
    /// disconnected and every call returns `ServerNotAvailable` until
    /// [`CompatClient::add_host`] succeeds.
    pub fn connect<C>(connector: C, hosts: &[Host]) -> Self
    where
        C: Connector + Send + Sync + 'static,
    {
        let mut client = CompatClient {
            connector: Box::new(connector),
            hosts: hosts.to_vec(),
            client: None,
        };
        client.reconnect();
        client
    }

    /// Connect using a loaded configuration and apply its log level
    pub fn connect_with_config<C>(connector: C, config: &CompatConfig) -> Result<Self>
    where
        C: Connector + Send + Sync + 'static,
    {
        logging::set_log_level(config.log_level);
        let hosts = config.seed_hosts()?;
        Ok(Self::connect(connector, &hosts))
    }

    fn reconnect(&mut self) -> bool {
        match self.connector.connect(&self.hosts) {
            Ok(client) => {
                info!(hosts = self.hosts.len(), "cluster connection established");
                self.client = Some(client);
                true
            }
            Err(err) => {
                warn!(native = err.code, error = %err.message, "cluster unreachable, client not connected");
                self.client = None;
                false
            }
        }
    }

    /// Add a seed host and retry the connection if not connected.
    ///
    /// Returns whether the client is connected afterwards.
    pub fn add_host(&mut self, host: Host) -> bool {
        if !self.hosts.contains(&host) {
            self.hosts.push(host);
        }
        if self.is_connected() {
            return true;
        }
        self.reconnect()
    }

    /// Whether a live cluster connection exists
    pub fn is_connected(&self) -> bool {
        self.client.as_ref().map(|c| c.is_connected()).unwrap_or(false)
    }

    /// Names of the nodes currently in the cluster
    pub fn node_names(&self) -> Vec<String> {
        self.client.as_ref().map(|c| c.node_names()).unwrap_or_default()
    }

    /// Seed hosts known to this client
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Close the cluster connection
    pub fn close(&mut self) {
        if let Some(client) = self.client.take() {
            client.close();
            info!("cluster connection closed");
        }
    }

    fn with_client<F>(&self, call: F) -> OperationResult
    where
        F: FnOnce(&dyn RecordClient) -> OperationResult,
    {
        match &self.client {
            Some(client) => call(client.as_ref()),
            None => not_connected(),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    fn write(
        &self,
        key: &Key,
        mut operations: Vec<Operation>,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        if operations.is_empty() {
            return OperationResult::with_code(ResultCode::ParameterError);
        }
        operations.push(Operation::ReadHeader);
        let policy = to_write_policy(tx, write);
        debug!(key = %key, ops = operations.len(), "write");
        self.with_client(|client| normalize::from_write(client.operate(&policy, key, &operations)))
    }

    /// Write bins, returning the new generation
    pub fn set(
        &self,
        key: &Key,
        bins: &[Bin],
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.write(key, bin_ops(bins, Operation::Write), tx, write)
    }

    /// Write one bin
    pub fn set_bin(
        &self,
        key: &Key,
        name: &str,
        value: impl Into<Value>,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.set(key, &[Bin::new(name, value)], tx, write)
    }

    /// Write a name→value map
    pub fn set_map(
        &self,
        key: &Key,
        bins: &BinMap,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.set(key, &map_bins(bins), tx, write)
    }

    /// Append to string or bytes bins
    pub fn append(
        &self,
        key: &Key,
        bins: &[Bin],
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.write(key, bin_ops(bins, Operation::Append), tx, write)
    }

    /// Append to one bin
    pub fn append_bin(
        &self,
        key: &Key,
        name: &str,
        value: impl Into<Value>,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.append(key, &[Bin::new(name, value)], tx, write)
    }

    /// Append a name→value map
    pub fn append_map(
        &self,
        key: &Key,
        bins: &BinMap,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.append(key, &map_bins(bins), tx, write)
    }

    /// Prepend to string or bytes bins
    pub fn prepend(
        &self,
        key: &Key,
        bins: &[Bin],
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.write(key, bin_ops(bins, Operation::Prepend), tx, write)
    }

    /// Prepend to one bin
    pub fn prepend_bin(
        &self,
        key: &Key,
        name: &str,
        value: impl Into<Value>,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.prepend(key, &[Bin::new(name, value)], tx, write)
    }

    /// Prepend a name→value map
    pub fn prepend_map(
        &self,
        key: &Key,
        bins: &BinMap,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.prepend(key, &map_bins(bins), tx, write)
    }

    /// Add to integer or float bins
    pub fn add(
        &self,
        key: &Key,
        bins: &[Bin],
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.write(key, bin_ops(bins, Operation::Add), tx, write)
    }

    /// Add to one bin
    pub fn add_bin(
        &self,
        key: &Key,
        name: &str,
        value: impl Into<Value>,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.add(key, &[Bin::new(name, value)], tx, write)
    }

    /// Add a name→value map
    pub fn add_map(
        &self,
        key: &Key,
        bins: &BinMap,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        self.add(key, &map_bins(bins), tx, write)
    }

    /// Add to bins and read the whole record back in one round trip
    pub fn add_and_get(
        &self,
        key: &Key,
        bins: &[Bin],
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        if bins.is_empty() {
            return OperationResult::with_code(ResultCode::ParameterError);
        }
        let mut operations = bin_ops(bins, Operation::Add);
        operations.push(Operation::ReadAll);
        let policy = to_write_policy(tx, write);
        debug!(key = %key, "add and get");
        self.with_client(|client| normalize::from_operate(client.operate(&policy, key, &operations)))
    }

    /// Delete a record: `Ok`, or `KeyNotFound` if it did not exist
    pub fn delete(
        &self,
        key: &Key,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        let policy = to_write_policy(tx, write);
        debug!(key = %key, "delete");
        self.with_client(|client| normalize::from_found(client.delete(&policy, key)))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    fn read(&self, key: &Key, bins: BinSelection, tx: Option<&TransactionOptions>) -> OperationResult {
        let policy = to_policy(tx);
        debug!(key = %key, "read");
        self.with_client(|client| normalize::from_read(client.get(&policy, key, &bins)))
    }

    /// Read one bin into `single_value`
    pub fn get(&self, key: &Key, bin_name: &str, tx: Option<&TransactionOptions>) -> OperationResult {
        let result = self.read(key, BinSelection::named([bin_name]), tx);
        normalize::with_single_value(result, bin_name)
    }

    /// Read the named bins
    pub fn get_bins(&self, key: &Key, bin_names: &[&str], tx: Option<&TransactionOptions>) -> OperationResult {
        self.read(key, BinSelection::named(bin_names.iter().copied()), tx)
    }

    /// Read every bin
    pub fn get_all(&self, key: &Key, tx: Option<&TransactionOptions>) -> OperationResult {
        self.read(key, BinSelection::All, tx)
    }

    /// Reset expiration from `write` and read bins in one round trip.
    ///
    /// `None` names read every bin.
    pub fn get_with_touch(
        &self,
        key: &Key,
        bin_names: Option<&[&str]>,
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        let mut operations = vec![Operation::Touch];
        match bin_names {
            Some(names) => operations.extend(names.iter().map(|n| Operation::Read(n.to_string()))),
            None => operations.push(Operation::ReadAll),
        }
        let policy = to_write_policy(tx, write);
        debug!(key = %key, "get with touch");
        self.with_client(|client| normalize::from_operate(client.operate(&policy, key, &operations)))
    }

    /// Check whether a record exists
    pub fn exists(&self, key: &Key, tx: Option<&TransactionOptions>) -> OperationResult {
        let policy = to_policy(tx);
        self.with_client(|client| normalize::from_found(client.exists(&policy, key)))
    }

    /// Read bins and write bins in one round trip.
    ///
    /// Writes apply first; reads observe the result. With no read names the
    /// result carries only the new generation.
    pub fn operate(
        &self,
        key: &Key,
        read_bins: &[&str],
        write_bins: &[Bin],
        tx: Option<&TransactionOptions>,
        write: Option<&WriteOptions>,
    ) -> OperationResult {
        let mut operations = bin_ops(write_bins, Operation::Write);
        if read_bins.is_empty() {
            operations.push(Operation::ReadHeader);
        } else {
            operations.extend(read_bins.iter().map(|n| Operation::Read(n.to_string())));
        }
        let policy = to_write_policy(tx, write);
        debug!(key = %key, reads = read_bins.len(), writes = write_bins.len(), "operate");
        self.with_client(|client| {
            let outcome = client.operate(&policy, key, &operations);
            if read_bins.is_empty() {
                normalize::from_write(outcome)
            } else {
                normalize::from_operate(outcome)
            }
        })
    }

    // =========================================================================
    // Batch
    // =========================================================================

    fn batch(&self, keys: &[Key], call: impl FnOnce(&dyn RecordClient) -> Vec<OperationResult>) -> Vec<OperationResult> {
        match &self.client {
            Some(client) => call(client.as_ref()),
            None => vec![not_connected(); keys.len()],
        }
    }

    /// Existence of many prebuilt references, positionally aligned
    pub fn batch_exists_refs(&self, keys: &[Key], tx: Option<&TransactionOptions>) -> Vec<OperationResult> {
        let policy = to_policy(tx);
        self.batch(keys, |client| batch::exists(client, &policy, keys))
    }

    /// Existence of many user keys
    pub fn batch_exists(
        &self,
        namespace: &str,
        set_name: &str,
        user_keys: Option<&[Value]>,
        tx: Option<&TransactionOptions>,
    ) -> Result<Vec<OperationResult>> {
        let keys = address::build_refs(namespace, set_name, user_keys)?;
        Ok(self.batch_exists_refs(&keys, tx))
    }

    /// Existence of many digests
    pub fn batch_exists_digests(
        &self,
        namespace: &str,
        digests: Option<&[Digest]>,
        tx: Option<&TransactionOptions>,
    ) -> Result<Vec<OperationResult>> {
        let keys = address::build_refs_from_digests(namespace, digests)?;
        Ok(self.batch_exists_refs(&keys, tx))
    }

    /// Read many prebuilt references; `None` names read every bin
    pub fn batch_get_refs(
        &self,
        keys: &[Key],
        bin_names: Option<&[&str]>,
        tx: Option<&TransactionOptions>,
    ) -> Vec<OperationResult> {
        let policy = to_policy(tx);
        let bins = selection(bin_names);
        self.batch(keys, |client| batch::get(client, &policy, keys, &bins))
    }

    /// Read the named bins of many user keys
    pub fn batch_get(
        &self,
        namespace: &str,
        set_name: &str,
        user_keys: Option<&[Value]>,
        bin_names: &[&str],
        tx: Option<&TransactionOptions>,
    ) -> Result<Vec<OperationResult>> {
        let keys = address::build_refs(namespace, set_name, user_keys)?;
        Ok(self.batch_get_refs(&keys, Some(bin_names), tx))
    }

    /// Read every bin of many user keys
    pub fn batch_get_all(
        &self,
        namespace: &str,
        set_name: &str,
        user_keys: Option<&[Value]>,
        tx: Option<&TransactionOptions>,
    ) -> Result<Vec<OperationResult>> {
        let keys = address::build_refs(namespace, set_name, user_keys)?;
        Ok(self.batch_get_refs(&keys, None, tx))
    }

    /// Read many digests; `None` names read every bin
    pub fn batch_get_digests(
        &self,
        namespace: &str,
        digests: Option<&[Digest]>,
        bin_names: Option<&[&str]>,
        tx: Option<&TransactionOptions>,
    ) -> Result<Vec<OperationResult>> {
        let keys = address::build_refs_from_digests(namespace, digests)?;
        Ok(self.batch_get_refs(&keys, bin_names, tx))
    }

    // =========================================================================
    // Scan
    // =========================================================================

    /// Scan a namespace/set across the cluster.
    ///
    /// An empty `set_name` scans every set. Blocks until the scan completes;
    /// `callback` receives `user_data` with every record.
    pub fn scan<U, F>(
        &self,
        namespace: &str,
        set_name: &str,
        options: Option<&ScanOptions>,
        callback: F,
        user_data: &U,
    ) -> OperationResult
    where
        U: Sync + ?Sized,
        F: Fn(&str, &str, &Digest, &BinMap, u32, u32, &U) + Sync,
    {
        let policy = to_scan_policy(options);
        self.with_client(|client| {
            scan::run(client, &policy, ScanTarget::AllNodes, namespace, set_name, callback, user_data)
        })
    }

    /// Scan a single node
    pub fn scan_node<U, F>(
        &self,
        node_name: &str,
        namespace: &str,
        set_name: &str,
        options: Option<&ScanOptions>,
        callback: F,
        user_data: &U,
    ) -> OperationResult
    where
        U: Sync + ?Sized,
        F: Fn(&str, &str, &Digest, &BinMap, u32, u32, &U) + Sync,
    {
        let policy = to_scan_policy(options);
        self.with_client(|client| {
            scan::run(
                client,
                &policy,
                ScanTarget::Node(node_name),
                namespace,
                set_name,
                callback,
                user_data,
            )
        })
    }

    /// Scan every node in parallel regardless of `options.concurrent_nodes`
    pub fn scan_all_nodes<U, F>(
        &self,
        namespace: &str,
        set_name: &str,
        options: Option<&ScanOptions>,
        callback: F,
        user_data: &U,
    ) -> OperationResult
    where
        U: Sync + ?Sized,
        F: Fn(&str, &str, &Digest, &BinMap, u32, u32, &U) + Sync,
    {
        let mut policy = to_scan_policy(options);
        policy.concurrent_nodes = true;
        self.with_client(|client| {
            scan::run(client, &policy, ScanTarget::AllNodes, namespace, set_name, callback, user_data)
        })
    }
}

fn not_connected() -> OperationResult {
    normalize::from_error(&ClientError::new(
        NativeCode::ServerNotAvailable,
        "client is not connected",
    ))
}

fn bin_ops(bins: &[Bin], op: fn(Bin) -> Operation) -> Vec<Operation> {
    bins.iter().cloned().map(op).collect()
}

fn map_bins(bins: &BinMap) -> Vec<Bin> {
    bins.iter()
        .map(|(name, value)| Bin::new(name.as_str(), value.clone()))
        .collect()
}

fn selection(bin_names: Option<&[&str]>) -> BinSelection {
    match bin_names {
        Some(names) => BinSelection::named(names.iter().copied()),
        None => BinSelection::All,
    }
}
