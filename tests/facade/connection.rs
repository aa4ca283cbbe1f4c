//! Connection lifecycle scenarios

use std::sync::Arc;

use crate::common::*;
use kvcompat::{ClientError, NativeCode, RecordedPolicy};

#[test]
fn test_unreachable_cluster_gives_server_not_available() {
    let memory = Arc::new(MemoryClient::default());
    let mut client = CompatClient::connect(
        MemoryConnector::localhost(memory.clone()),
        &[Host::new("192.0.2.1", 3000)],
    );
    assert!(!client.is_connected());

    let key = build_ref(NS, "c", &Value::Int(1)).unwrap();
    assert_code(&client.set_bin(&key, "v", 1, None, None), ResultCode::ServerNotAvailable);
    assert_code(&client.get_all(&key, None), ResultCode::ServerNotAvailable);
    let scan = client.scan(NS, "c", None, |_, _, _, _, _, _, _: &()| {}, &());
    assert_code(&scan, ResultCode::ServerNotAvailable);
    assert_eq!(memory.call_count(), 0);

    assert!(client.add_host(seed()));
    assert_ok(&client.set_bin(&key, "v", 1, None, None));
    assert_eq!(client.hosts().len(), 2);
}

#[test]
fn test_close_disconnects() {
    let mut cluster = TestCluster::new();
    let key = cluster.key("c", "a");
    assert_ok(&cluster.client.set_bin(&key, "v", 1, None, None));
    cluster.client.close();
    assert!(!cluster.client.is_connected());
    assert_code(&cluster.client.exists(&key, None), ResultCode::ServerNotAvailable);

    // Reconnecting finds the data again
    assert!(cluster.client.add_host(seed()));
    assert_ok(&cluster.client.exists(&key, None));
}

#[test]
fn test_injected_faults_are_normalized() {
    let cluster = TestCluster::new();
    let key = cluster.key("c", "f");
    let cases = [
        (NativeCode::Timeout, ResultCode::Timeout),
        (NativeCode::DeviceOverload, ResultCode::ServerNotAvailable),
        (NativeCode::NoXdr, ResultCode::FeatureUnavailable),
        (NativeCode::KeyBusy, ResultCode::KeyBusy),
        (NativeCode::InvalidNode, ResultCode::ClientError),
    ];
    for (native, expected) in cases {
        cluster.memory.fail_next(ClientError::new(native, "injected"));
        assert_code(&cluster.client.set_bin(&key, "v", 1, None, None), expected);
    }

    cluster.memory.fail_next(ClientError::from_raw(-77, "unknown"));
    assert_code(&cluster.client.get_all(&key, None), ResultCode::ServerError);
}

#[test]
fn test_one_shot_policy_reaches_client() {
    let cluster = TestCluster::new();
    let key = cluster.key("c", "p");
    let tx = TransactionOptions::new().with_timeout_ms(750).one_shot();
    cluster.client.get_all(&key, Some(&tx));
    match cluster.memory.last_policy() {
        Some(RecordedPolicy::Read(policy)) => {
            assert_eq!(policy.max_retries, 0);
            assert_eq!(policy.timeout.as_millis(), 750);
            assert!(policy.sleep_between_retries.is_zero());
        }
        other => panic!("unexpected policy {:?}", other),
    }
}
