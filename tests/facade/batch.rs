//! Batch fan-out scenarios

use crate::common::*;
use kvcompat::{ClientError, NativeCode};

#[test]
fn test_batch_with_missing_key_keeps_order() {
    let cluster = TestCluster::new();
    let user_keys: Vec<Value> = (0..8).map(Value::Int).collect();
    for (i, user_key) in user_keys.iter().enumerate() {
        if i == 5 {
            continue;
        }
        let key = build_ref(NS, "batch", user_key).unwrap();
        cluster.client.set_bin(&key, "i", i as i64, None, None);
    }

    let results = cluster
        .client
        .batch_get_all(NS, "batch", Some(user_keys.as_slice()), None)
        .unwrap();
    assert_eq!(results.len(), 8);
    for (i, r) in results.iter().enumerate() {
        if i == 5 {
            assert_code(r, ResultCode::KeyNotFound);
        } else {
            assert_ok(r);
            assert_eq!(r.value("i"), Some(&Value::Int(i as i64)));
        }
    }
}

#[test]
fn test_batch_is_one_client_call() {
    let cluster = TestCluster::new();
    cluster.seed_ints("batch", 10);
    let keys: Vec<Key> = (0..10).map(|i| cluster.int_key("batch", i)).collect();
    let before = cluster.memory.call_count();
    let results = cluster.client.batch_exists_refs(&keys, None);
    assert_eq!(cluster.memory.call_count(), before + 1);
    assert!(results.iter().all(OperationResult::is_ok));
}

#[test]
fn test_call_level_failure_fills_every_slot() {
    let cluster = TestCluster::new();
    cluster.seed_ints("batch", 3);
    cluster
        .memory
        .fail_next(ClientError::new(NativeCode::ClusterKeyMismatch, "cluster changed"));
    let user_keys: Vec<Value> = (0..3).map(Value::Int).collect();
    let results = cluster
        .client
        .batch_exists(NS, "batch", Some(user_keys.as_slice()), None)
        .unwrap();
    assert_eq!(results.len(), 3);
    for r in &results {
        assert_code(r, ResultCode::ClusterKeyMismatch);
    }
}

#[test]
fn test_batch_by_digest() {
    let cluster = TestCluster::new();
    cluster.seed_ints("batch", 4);
    let digests: Vec<Digest> = (0..4)
        .map(|i| compute_digest("batch", &Value::Int(i)).unwrap())
        .collect();
    let results = cluster
        .client
        .batch_get_digests(NS, Some(digests.as_slice()), Some(&["i"][..]), None)
        .unwrap();
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.value("i"), Some(&Value::Int(i as i64)));
    }
}

#[test]
fn test_absent_collection_rejected_empty_accepted() {
    let cluster = TestCluster::new();
    let err = cluster.client.batch_get(NS, "batch", None, &["i"], None).unwrap_err();
    assert_eq!(err.result_code(), ResultCode::ParameterError);

    let empty = cluster
        .client
        .batch_get(NS, "batch", Some(&[][..]), &["i"], None)
        .unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_corrupted_record_fails_only_its_slot() {
    let cluster = TestCluster::with_nodes(1);
    cluster.seed_ints("batch", 3);
    assert!(cluster.memory.corrupt(&cluster.int_key("batch", 1)));

    let user_keys: Vec<Value> = (0..3).map(Value::Int).collect();
    let results = cluster
        .client
        .batch_get_all(NS, "batch", Some(user_keys.as_slice()), None)
        .unwrap();
    assert_ok(&results[0]);
    assert_eq!(results[0].value("i"), Some(&Value::Int(0)));
    assert_code(&results[1], ResultCode::ClientError);
    assert_ok(&results[2]);
    assert_eq!(results[2].value("i"), Some(&Value::Int(2)));
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn batch_results_follow_key_order(present in proptest::collection::vec(any::<bool>(), 1..24)) {
            let cluster = TestCluster::with_nodes(2);
            for (i, keep) in present.iter().enumerate() {
                if *keep {
                    assert_ok(&cluster.client.set_bin(&cluster.int_key("prop", i as i64), "i", i as i64, None, None));
                }
            }
            let user_keys: Vec<Value> = (0..present.len() as i64).map(Value::Int).collect();

            let records = cluster
                .client
                .batch_get_all(NS, "prop", Some(user_keys.as_slice()), None)
                .unwrap();
            let found = cluster
                .client
                .batch_exists(NS, "prop", Some(user_keys.as_slice()), None)
                .unwrap();
            prop_assert_eq!(records.len(), present.len());
            prop_assert_eq!(found.len(), present.len());
            for (i, keep) in present.iter().enumerate() {
                let expected = if *keep { ResultCode::Ok } else { ResultCode::KeyNotFound };
                prop_assert_eq!(records[i].result_code, expected);
                prop_assert_eq!(found[i].result_code, expected);
                if *keep {
                    prop_assert_eq!(records[i].value("i"), Some(&Value::Int(i as i64)));
                }
            }
        }
    }
}
