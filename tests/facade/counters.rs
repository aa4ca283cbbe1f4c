//! Counter and bin-operation scenarios

use crate::common::*;

#[test]
fn test_counter_add_twice() {
    let cluster = TestCluster::new();
    let key = cluster.key("counters", "hits");
    assert_ok(&cluster.client.set_bin(&key, "count", 10, None, None));

    let first = cluster.client.add_bin(&key, "count", 5, None, None);
    let second = cluster.client.add_bin(&key, "count", 5, None, None);
    assert_ok(&first);
    assert_ok(&second);
    assert_eq!(second.generation.unwrap(), first.generation.unwrap() + 1);

    let read = cluster.client.get(&key, "count", None);
    assert_ok(&read);
    assert_eq!(read.single_value, Some(Value::Int(20)));
    assert_eq!(read.generation, second.generation);
}

#[test]
fn test_add_and_get_single_round_trip() {
    let cluster = TestCluster::new();
    let key = cluster.key("counters", "rt");
    cluster.client.set(&key, &[Bin::new("a", 1), Bin::new("label", "x")], None, None);

    let calls = cluster.memory.call_count();
    let r = cluster
        .client
        .add_and_get(&key, &[Bin::new("a", 41)], None, None);
    assert_eq!(cluster.memory.call_count(), calls + 1);
    assert_ok(&r);
    assert_eq!(r.value("a"), Some(&Value::Int(42)));
    assert_eq!(r.value("label"), Some(&Value::from("x")));
    assert_eq!(r.generation, Some(2));
}

#[test]
fn test_add_creates_missing_bin() {
    let cluster = TestCluster::new();
    let key = cluster.key("counters", "fresh");
    let r = cluster.client.add_bin(&key, "n", 3, None, None);
    assert_ok(&r);
    assert_eq!(r.generation, Some(1));
    assert_eq!(cluster.client.get(&key, "n", None).single_value, Some(Value::Int(3)));
}

#[test]
fn test_float_add() {
    let cluster = TestCluster::new();
    let key = cluster.key("counters", "f");
    cluster.client.set_bin(&key, "x", 1.5, None, None);
    cluster.client.add_bin(&key, "x", 2.0, None, None);
    assert_eq!(cluster.client.get(&key, "x", None).single_value, Some(Value::Float(3.5)));
}

#[test]
fn test_delete_missing_key() {
    let cluster = TestCluster::new();
    let key = cluster.key("counters", "never-written");
    assert_code(&cluster.client.delete(&key, None, None), ResultCode::KeyNotFound);
}

#[test]
fn test_delete_then_get() {
    let cluster = TestCluster::new();
    let key = cluster.key("counters", "gone");
    cluster.client.set_bin(&key, "v", 1, None, None);
    assert_ok(&cluster.client.delete(&key, None, None));
    let r = cluster.client.get_all(&key, None);
    assert_code(&r, ResultCode::KeyNotFound);
    assert!(r.values_by_name.is_none());
    assert_eq!(r.generation, None);
}

#[test]
fn test_record_too_big() {
    let memory = std::sync::Arc::new(MemoryClient::new(1).with_max_record_size(64));
    let client = CompatClient::connect(MemoryConnector::localhost(memory), &[seed()]);
    let key = build_ref(NS, "big", &Value::Int(1)).unwrap();
    let r = client.set_bin(&key, "blob", vec![0u8; 128], None, None);
    assert_code(&r, ResultCode::RecordTooBig);
    assert_code(&client.get_all(&key, None), ResultCode::KeyNotFound);
}

#[test]
fn test_null_write_removes_bin() {
    let cluster = TestCluster::new();
    let key = cluster.key("counters", "null");
    cluster.client.set(&key, &[Bin::new("a", 1), Bin::new("b", 2)], None, None);
    cluster.client.set_bin(&key, "a", Value::Null, None, None);
    let r = cluster.client.get_all(&key, None);
    assert_eq!(r.value("a"), None);
    assert_eq!(r.value("b"), Some(&Value::Int(2)));
}
