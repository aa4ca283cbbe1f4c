//! Logging shim and configuration file
//!
//! Everything touching the process-wide log state lives in one test so
//! parallel tests cannot interleave level changes. Other tests still log
//! through the installed shim, so assertions only look for known lines.

use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::common::*;
use kvcompat::{configure_logging, CompatConfig, LogCallback, LogLevel, CONFIG_FILE_NAME};

#[test]
fn test_config_drives_logging_and_connection() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "hosts = [\"192.0.2.1\", \"127.0.0.1:3000\"]\nlog_level = \"warn\"\ndefault_timeout_ms = 400\ndefault_retry = \"one_shot\"\n",
    )
    .unwrap();
    let config = CompatConfig::from_file(&path).unwrap();

    let lines: Arc<Mutex<Vec<(LogLevel, String)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    let callback: LogCallback =
        Arc::new(move |level: LogLevel, msg: &str| sink.lock().push((level, msg.to_string())));
    configure_logging(LogLevel::Debug, Some(callback));

    // No subscriber set up here: the logging entry point installs the shim
    let offline = CompatClient::connect(
        MemoryConnector::localhost(Arc::new(MemoryClient::default())),
        &[Host::new("192.0.2.1", 3000)],
    );
    assert!(!offline.is_connected());
    assert!(lines
        .lock()
        .iter()
        .any(|(level, msg)| *level == LogLevel::Warn && msg.starts_with("cluster unreachable")));

    let memory = Arc::new(MemoryClient::default());
    let client =
        CompatClient::connect_with_config(MemoryConnector::localhost(memory), &config).unwrap();
    assert!(client.is_connected());
    assert_eq!(kvcompat::logging::log_level(), LogLevel::Warn);

    let tx = config.transaction_options();
    let key = build_ref(NS, "log", &Value::Int(1)).unwrap();
    assert_code(&client.get_all(&key, Some(&tx)), ResultCode::KeyNotFound);

    // Below the configured level: dropped
    tracing::info!("not delivered");
    tracing::warn!(attempt = 2, "slow node");

    // An unreachable cluster from config is logged at warn too
    let unreachable = CompatConfig {
        hosts: vec!["192.0.2.1:3000".into()],
        ..config.clone()
    };
    let offline = CompatClient::connect_with_config(
        MemoryConnector::localhost(Arc::new(MemoryClient::default())),
        &unreachable,
    )
    .unwrap();
    assert!(!offline.is_connected());
    configure_logging(LogLevel::Info, None);

    let lines = lines.lock();
    assert!(lines.contains(&(LogLevel::Warn, "slow node attempt=2".to_string())));
    assert!(
        lines
            .iter()
            .filter(|(level, msg)| *level == LogLevel::Warn && msg.starts_with("cluster unreachable"))
            .count()
            >= 2
    );
    assert!(!lines.iter().any(|(_, msg)| msg.contains("not delivered")));
}

#[test]
fn test_default_config_file_created_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    CompatConfig::write_default_if_missing(&path).unwrap();
    let config = CompatConfig::from_file(&path).unwrap();
    assert_eq!(config.seed_hosts().unwrap(), vec![seed()]);
    assert_eq!(config.transaction_options(), TransactionOptions::default());
}
