//! Scan scenarios

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::common::*;

#[derive(Default)]
struct Collector {
    digests: Mutex<HashSet<Digest>>,
    bins_seen: AtomicUsize,
    threads: Mutex<HashSet<std::thread::ThreadId>>,
}

fn collect(
    _ns: &str,
    _set: &str,
    digest: &Digest,
    bins: &BinMap,
    _generation: u32,
    _expiration: u32,
    collector: &Collector,
) {
    collector.digests.lock().insert(*digest);
    collector.bins_seen.fetch_add(bins.len(), Ordering::SeqCst);
    collector.threads.lock().insert(std::thread::current().id());
}

#[test]
fn test_scan_delivers_every_record_with_user_data() {
    let cluster = TestCluster::new();
    cluster.seed_ints("scan", 30);
    let collector = Collector::default();

    let r = cluster.client.scan(NS, "scan", None, collect, &collector);
    assert_ok(&r);
    assert!(!r.data_corrupted);
    assert_eq!(collector.digests.lock().len(), 30);
    assert_eq!(collector.bins_seen.load(Ordering::SeqCst), 30);

    let expected: HashSet<Digest> = (0..30)
        .map(|i| compute_digest("scan", &Value::Int(i)).unwrap())
        .collect();
    assert_eq!(*collector.digests.lock(), expected);
}

#[test]
fn test_digest_only_scan() {
    let cluster = TestCluster::new();
    cluster.seed_ints("scan", 10);
    let collector = Collector::default();
    let options = ScanOptions::new().digests_only();

    let r = cluster.client.scan(NS, "scan", Some(&options), collect, &collector);
    assert_ok(&r);
    assert_eq!(collector.digests.lock().len(), 10);
    assert_eq!(collector.bins_seen.load(Ordering::SeqCst), 0);
}

#[test]
fn test_sequential_scan_runs_on_caller_thread() {
    let cluster = TestCluster::new();
    cluster.seed_ints("scan", 10);
    let collector = Collector::default();
    let options = ScanOptions::new().sequential();

    cluster.client.scan(NS, "scan", Some(&options), collect, &collector);
    let threads = collector.threads.lock();
    assert_eq!(threads.len(), 1);
    assert!(threads.contains(&std::thread::current().id()));
}

#[test]
fn test_scan_all_nodes_matches_per_node_scans() {
    let cluster = TestCluster::with_nodes(4);
    cluster.seed_ints("scan", 40);

    let all = Collector::default();
    assert_ok(&cluster.client.scan_all_nodes(NS, "scan", None, collect, &all));

    let per_node = Collector::default();
    for node in cluster.client.node_names() {
        assert_ok(&cluster.client.scan_node(&node, NS, "scan", None, collect, &per_node));
    }
    assert_eq!(*all.digests.lock(), *per_node.digests.lock());
    assert_eq!(all.digests.lock().len(), 40);
}

#[test]
fn test_scan_unknown_node() {
    let cluster = TestCluster::new();
    let r = cluster.client.scan_node("node-99", NS, "scan", None, collect, &Collector::default());
    assert_code(&r, ResultCode::ClientError);
}

#[test]
fn test_scan_flags_corrupted_records() {
    let cluster = TestCluster::with_nodes(1);
    cluster.seed_ints("scan", 5);
    assert!(cluster.memory.corrupt(&cluster.int_key("scan", 2)));

    let collector = Collector::default();
    let r = cluster.client.scan(NS, "scan", None, collect, &collector);
    assert_ok(&r);
    assert!(r.data_corrupted);
    assert_eq!(collector.digests.lock().len(), 4);

    // A direct read of the damaged record is a client error
    let read = cluster.client.get_all(&cluster.int_key("scan", 2), None);
    assert_code(&read, ResultCode::ClientError);
}

#[test]
fn test_scan_other_set_is_excluded() {
    let cluster = TestCluster::new();
    cluster.seed_ints("scan", 5);
    cluster.seed_ints("other", 7);
    let collector = Collector::default();
    cluster.client.scan(NS, "other", None, collect, &collector);
    assert_eq!(collector.digests.lock().len(), 7);

    let everything = Collector::default();
    cluster.client.scan(NS, "", None, collect, &everything);
    assert_eq!(everything.digests.lock().len(), 12);
}
