//! Logging shim
//!
//! The facade and the client log through `tracing`. This module bridges
//! those events to the legacy logging surface: one process-wide level and
//! an optional callback. Without a callback, lines go to stderr as
//! `<timestamp> [<thread>] LEVEL message`.
//!
//! The setters install [`CompatLogLayer`] as the global subscriber on first
//! use. Applications with their own subscriber can add the layer to it
//! instead; the install attempt then leaves theirs in place.

use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Legacy log levels, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational
    #[default]
    Info,
    /// Everything
    Debug,
}

impl LogLevel {
    /// Upper-case name used in log lines
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&Level> for LogLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => LogLevel::Error,
            Level::WARN => LogLevel::Warn,
            Level::INFO => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

/// Unrecognized log level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "trace" => Ok(LogLevel::Debug),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// User log sink
pub type LogCallback = Arc<dyn Fn(LogLevel, &str) + Send + Sync>;

#[derive(Default)]
struct LogState {
    level: LogLevel,
    callback: Option<LogCallback>,
}

static STATE: Lazy<RwLock<LogState>> = Lazy::new(|| RwLock::new(LogState::default()));

static INSTALLED: OnceCell<bool> = OnceCell::new();

/// Set the process-wide level
pub fn set_log_level(level: LogLevel) {
    install();
    STATE.write().level = level;
}

/// Current process-wide level
pub fn log_level() -> LogLevel {
    STATE.read().level
}

/// Route log lines to `callback` instead of stderr
pub fn set_log_callback<F>(callback: F)
where
    F: Fn(LogLevel, &str) + Send + Sync + 'static,
{
    install();
    STATE.write().callback = Some(Arc::new(callback));
}

/// Restore the stderr sink
pub fn clear_log_callback() {
    STATE.write().callback = None;
}

/// Set level and sink together; `None` restores stderr
pub fn configure_logging(level: LogLevel, callback: Option<LogCallback>) {
    install();
    let mut state = STATE.write();
    state.level = level;
    state.callback = callback;
}

/// Whether a line at `level` would be emitted
pub fn enabled(level: LogLevel) -> bool {
    level <= log_level()
}

/// Emit one line through the configured sink
pub fn emit(level: LogLevel, message: &str) {
    let callback = {
        let state = STATE.read();
        if level > state.level {
            return;
        }
        state.callback.clone()
    };
    match callback {
        Some(callback) => callback(level, message),
        None => {
            let line = format_line(&timestamp(), &thread_label(), level, message);
            // A failed stderr write has nowhere to be reported
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
        }
    }
}

/// Render a stderr line
pub fn format_line(timestamp: &str, thread: &str, level: LogLevel, message: &str) -> String {
    format!("{} [{}] {} {}", timestamp, thread, level, message)
}

fn timestamp() -> String {
    Utc::now().format("%b %d %Y %H:%M:%S%.3f UTC").to_string()
}

fn thread_label() -> String {
    let current = std::thread::current();
    match current.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", current.id()),
    }
}

/// Collects an event's message and fields into one line
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl LineVisitor {
    fn finish(self) -> String {
        self.message + &self.fields
    }
}

/// `tracing` layer forwarding events to the legacy sink
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatLogLayer;

impl CompatLogLayer {
    /// Create the layer
    pub fn new() -> Self {
        CompatLogLayer
    }
}

impl<S: Subscriber> Layer<S> for CompatLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = LogLevel::from(event.metadata().level());
        if !enabled(level) {
            return;
        }
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        emit(level, &visitor.finish());
    }
}

/// Install the shim as the global subscriber, once per process.
///
/// Returns whether the shim owns the global subscriber. False when another
/// subscriber was set first.
pub fn install() -> bool {
    *INSTALLED.get_or_init(|| {
        tracing_subscriber::registry()
            .with(CompatLogLayer::new())
            .try_init()
            .is_ok()
    })
}
