//! Facade configuration via `kvcompat.toml`
//!
//! Seed hosts, log level and the default transaction options can be kept in
//! a TOML file instead of being passed on every call.

use std::path::Path;

use kvcompat_core::Host;
use serde::{Deserialize, Serialize};

use crate::error::{CompatError, Result};
use crate::logging::LogLevel;
use crate::options::{RetryMode, TransactionOptions, DEFAULT_TIMEOUT_MS};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "kvcompat.toml";

/// Port assumed when a host entry has none
pub const DEFAULT_PORT: u16 = 3000;

fn default_hosts() -> Vec<String> {
    vec![format!("127.0.0.1:{}", DEFAULT_PORT)]
}

fn default_timeout_ms() -> u32 {
    DEFAULT_TIMEOUT_MS
}

/// Facade configuration loaded from `kvcompat.toml`.
///
/// # Example
///
/// ```toml
/// hosts = ["10.0.0.1:3000", "10.0.0.2"]
/// log_level = "warn"
/// default_timeout_ms = 1000
/// default_retry = "one_shot"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatConfig {
    /// Seed hosts as `name[:port]`
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,
    /// Log level for the logging shim
    #[serde(default)]
    pub log_level: LogLevel,
    /// Timeout used by [`CompatConfig::transaction_options`]
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u32,
    /// Retry mode used by [`CompatConfig::transaction_options`]
    #[serde(default)]
    pub default_retry: RetryMode,
}

impl Default for CompatConfig {
    fn default() -> Self {
        CompatConfig {
            hosts: default_hosts(),
            log_level: LogLevel::default(),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_retry: RetryMode::default(),
        }
    }
}

impl CompatConfig {
    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# kvcompat configuration
#
# Seed hosts, "name:port" or "name" (port 3000)
hosts = ["127.0.0.1:3000"]

# Log level: "error", "warn", "info" (default) or "debug"
log_level = "info"

# Default transaction options
#   default_retry = "retry"    retries within the timeout
#   default_retry = "one_shot" single attempt
default_timeout_ms = 5000
default_retry = "retry"
"#
    }

    /// Parse config text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CompatConfig = toml::from_str(content)
            .map_err(|e| CompatError::Config(format!("failed to parse config: {}", e)))?;
        config.seed_hosts()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CompatError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Write the default config file if it does not already exist
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                CompatError::Config(format!("failed to write '{}': {}", path.display(), e))
            })?;
        }
        Ok(())
    }

    /// Serialize this config and write it to `path`
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CompatError::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)
            .map_err(|e| CompatError::Config(format!("failed to write '{}': {}", path.display(), e)))
    }

    /// Parsed seed hosts
    pub fn seed_hosts(&self) -> Result<Vec<Host>> {
        self.hosts.iter().map(|entry| parse_host(entry)).collect()
    }

    /// Transaction options built from the defaults
    pub fn transaction_options(&self) -> TransactionOptions {
        TransactionOptions::new()
            .with_timeout_ms(self.default_timeout_ms)
            .with_retry_mode(self.default_retry)
    }
}

/// Parse `name[:port]`, or `[ipv6]` / `[ipv6]:port` for IPv6 literals
pub fn parse_host(entry: &str) -> Result<Host> {
    let entry = entry.trim();
    let invalid_port = || CompatError::Config(format!("invalid port in host '{}'", entry));
    let (name, port) = if let Some(rest) = entry.strip_prefix('[') {
        let (name, tail) = rest
            .split_once(']')
            .ok_or_else(|| CompatError::Config(format!("unclosed '[' in host '{}'", entry)))?;
        let port = match tail {
            "" => DEFAULT_PORT,
            _ => tail
                .strip_prefix(':')
                .and_then(|port| port.parse::<u16>().ok())
                .ok_or_else(invalid_port)?,
        };
        (name, port)
    } else {
        match entry.split_once(':') {
            Some((_, port)) if port.contains(':') => {
                return Err(CompatError::Config(format!(
                    "IPv6 host '{}' must be written as [address]:port",
                    entry
                )));
            }
            Some((name, port)) => (name, port.parse::<u16>().map_err(|_| invalid_port())?),
            None => (entry, DEFAULT_PORT),
        }
    };
    if name.is_empty() {
        return Err(CompatError::Config(format!("empty host name in '{}'", entry)));
    }
    Ok(Host::new(name, port))
}
