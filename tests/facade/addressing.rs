//! Digest and key addressing scenarios

use crate::common::*;

#[test]
fn test_digest_and_key_addressing_equivalent() {
    let cluster = TestCluster::new();
    let key = cluster.key("users", "alice");
    cluster.client.set_bin(&key, "age", 30, None, None);

    let digest = compute_digest("users", &Value::from("alice")).unwrap();
    let by_digest = build_ref_from_digest(NS, &digest);
    let via_digest = cluster.client.get_all(&by_digest, None);
    let via_key = cluster.client.get_all(&key, None);
    assert_eq!(via_digest, via_key);

    // Writes through the digest land on the same record
    let w = cluster.client.add_bin(&by_digest, "age", 1, None, None);
    assert_eq!(w.generation, Some(2));
    assert_eq!(cluster.client.get(&key, "age", None).single_value, Some(Value::Int(31)));
}

#[test]
fn test_wrong_digest_addresses_other_record() {
    let cluster = TestCluster::new();
    let key = cluster.key("users", "bob");
    cluster.client.set_bin(&key, "v", 1, None, None);

    let wrong = compute_digest("admins", &Value::from("bob")).unwrap();
    let r = cluster.client.get_all(&build_ref_from_digest(NS, &wrong), None);
    assert_code(&r, ResultCode::KeyNotFound);
}

#[test]
fn test_key_types_do_not_collide() {
    let cluster = TestCluster::new();
    let as_string = build_ref(NS, "t", &Value::from("1")).unwrap();
    let as_int = build_ref(NS, "t", &Value::Int(1)).unwrap();
    assert_ne!(as_string.digest, as_int.digest);

    cluster.client.set_bin(&as_string, "v", "string", None, None);
    assert_code(&cluster.client.get_all(&as_int, None), ResultCode::KeyNotFound);
}

#[test]
fn test_invalid_user_key_is_parameter_error() {
    let err = build_ref(NS, "t", &Value::Null).unwrap_err();
    assert_eq!(err.result_code(), ResultCode::ParameterError);
}
