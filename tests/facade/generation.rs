//! Optimistic concurrency scenarios

use crate::common::*;

#[test]
fn test_expect_equal_wrong_generation() {
    let cluster = TestCluster::new();
    let key = cluster.key("gen", "a");
    let written = cluster.client.set_bin(&key, "v", 1, None, None);
    assert_eq!(written.generation, Some(1));

    let w = WriteOptions::new().expect_generation(99);
    let r = cluster.client.set_bin(&key, "v", 2, None, Some(&w));
    assert_code(&r, ResultCode::GenerationMismatch);

    let read = cluster.client.get(&key, "v", None);
    assert_eq!(read.single_value, Some(Value::Int(1)));
    assert_eq!(read.generation, Some(1));
}

#[test]
fn test_expect_equal_matching_generation() {
    let cluster = TestCluster::new();
    let key = cluster.key("gen", "b");
    let written = cluster.client.set_bin(&key, "v", 1, None, None);
    let w = WriteOptions::new().expect_generation(written.generation.unwrap());
    let r = cluster.client.set_bin(&key, "v", 2, None, Some(&w));
    assert_ok(&r);
    assert_eq!(r.generation, Some(2));
}

#[test]
fn test_expect_greater_or_equal() {
    let cluster = TestCluster::new();
    let key = cluster.key("gen", "c");
    cluster.client.set_bin(&key, "v", 1, None, None);
    cluster.client.set_bin(&key, "v", 2, None, None);

    let ok = WriteOptions::new().expect_generation_at_least(2);
    assert_ok(&cluster.client.set_bin(&key, "v", 3, None, Some(&ok)));

    let too_new = WriteOptions::new().expect_generation_at_least(10);
    assert_code(
        &cluster.client.set_bin(&key, "v", 4, None, Some(&too_new)),
        ResultCode::GenerationMismatch,
    );
}

#[test]
fn test_unique_wins_over_generation() {
    let cluster = TestCluster::new();
    let key = cluster.key("gen", "d");
    cluster.client.set_bin(&key, "v", 1, None, None);

    // Generation matches, but unique-only still refuses the overwrite
    let w = WriteOptions::new().unique().expect_generation(1);
    assert_code(&cluster.client.set_bin(&key, "v", 2, None, Some(&w)), ResultCode::KeyExists);

    let fresh = cluster.key("gen", "e");
    assert_ok(&cluster.client.set_bin(&fresh, "v", 1, None, Some(&w)));
}

#[test]
fn test_generation_guarded_delete() {
    let cluster = TestCluster::new();
    let key = cluster.key("gen", "f");
    cluster.client.set_bin(&key, "v", 1, None, None);
    let stale = WriteOptions::new().expect_generation(5);
    assert_code(&cluster.client.delete(&key, None, Some(&stale)), ResultCode::GenerationMismatch);
    let current = WriteOptions::new().expect_generation(1);
    assert_ok(&cluster.client.delete(&key, None, Some(&current)));
}
