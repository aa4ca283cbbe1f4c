//! Duplicate-version scenarios

use crate::common::*;

#[test]
fn test_mismatch_keeps_duplicate() {
    let cluster = TestCluster::new();
    let key = cluster.key("dup", "a");
    cluster.client.set_bin(&key, "v", 1, None, None);

    let w = WriteOptions::new().keep_duplicate_on_mismatch(7);
    let r = cluster.client.set_bin(&key, "v", 2, None, Some(&w));
    assert_ok(&r);

    let read = cluster.client.get_all(&key, None);
    assert_ok(&read);
    assert!(read.values_by_name.is_none());
    let versions = read.duplicate_versions.expect("duplicates returned");
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].get("v"), Some(&Value::Int(1)));
    assert_eq!(versions[1].get("v"), Some(&Value::Int(2)));
}

#[test]
fn test_matching_generation_writes_through() {
    let cluster = TestCluster::new();
    let key = cluster.key("dup", "b");
    cluster.client.set_bin(&key, "v", 1, None, None);

    let w = WriteOptions::new().keep_duplicate_on_mismatch(1);
    cluster.client.set_bin(&key, "v", 2, None, Some(&w));
    let read = cluster.client.get(&key, "v", None);
    assert!(read.duplicate_versions.is_none());
    assert_eq!(read.single_value, Some(Value::Int(2)));
}

#[test]
fn test_stronger_mode_shadows_duplicate_mode() {
    let cluster = TestCluster::new();
    let key = cluster.key("dup", "c");
    cluster.client.set_bin(&key, "v", 1, None, None);

    // Expect-equal outranks keep-duplicate even when set first
    let w = WriteOptions::new()
        .expect_generation(3)
        .keep_duplicate_on_mismatch(3);
    assert_code(
        &cluster.client.set_bin(&key, "v", 2, None, Some(&w)),
        ResultCode::GenerationMismatch,
    );
}
