//! Error types shared by the model and the cluster client contract
//!
//! Two families live here:
//! - [`ClientError`]: raised by a [`RecordClient`](crate::traits::RecordClient)
//!   implementation. Carries the client's raw integer result code.
//! - [`Error`]: model-level failures detected before any client call
//!   (for example an unusable user key).
//!
//! [`NativeCode`] names every result code the client is known to produce.
//! Codes outside that set still round-trip through `ClientError::code`.

use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for cluster client calls
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Result codes produced by the cluster client.
///
/// Negative codes originate in the client itself, non-negative codes are
/// returned by the server.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeCode {
    /// Value could not be serialized for the wire
    SerializeError = -10,
    /// No node in the cluster could serve the request
    ServerNotAvailable = -8,
    /// Target node is not reachable or not part of the cluster
    InvalidNode = -3,
    /// Server response could not be parsed
    ParseError = -2,
    /// Success
    Ok = 0,
    /// Unclassified server failure
    ServerError = 1,
    /// Record does not exist
    KeyNotFound = 2,
    /// Generation check failed
    GenerationError = 3,
    /// Request parameters rejected by the server
    ParameterError = 4,
    /// Create-only write found an existing record
    KeyExists = 5,
    /// Create-only bin write found an existing bin
    BinExists = 6,
    /// Cluster epoch changed under the request
    ClusterKeyMismatch = 7,
    /// Server ran out of memory
    ServerMemError = 8,
    /// Request timed out
    Timeout = 9,
    /// Cross-datacenter replication is not available
    NoXdr = 10,
    /// Server storage device is overloaded
    DeviceOverload = 11,
    /// Operation does not apply to the bin's type
    BinTypeError = 12,
    /// Record exceeds the configured maximum size
    RecordTooBig = 13,
    /// Too many concurrent operations on the same record
    KeyBusy = 14,
}

impl NativeCode {
    /// Every known code, in ascending numeric order.
    pub const ALL: [NativeCode; 19] = [
        NativeCode::SerializeError,
        NativeCode::ServerNotAvailable,
        NativeCode::InvalidNode,
        NativeCode::ParseError,
        NativeCode::Ok,
        NativeCode::ServerError,
        NativeCode::KeyNotFound,
        NativeCode::GenerationError,
        NativeCode::ParameterError,
        NativeCode::KeyExists,
        NativeCode::BinExists,
        NativeCode::ClusterKeyMismatch,
        NativeCode::ServerMemError,
        NativeCode::Timeout,
        NativeCode::NoXdr,
        NativeCode::DeviceOverload,
        NativeCode::BinTypeError,
        NativeCode::RecordTooBig,
        NativeCode::KeyBusy,
    ];

    /// Look up a raw code. Returns `None` for codes this build does not know.
    pub fn from_code(code: i32) -> Option<NativeCode> {
        NativeCode::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Raw integer value
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Error raised by the cluster client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("client error {code}: {message}")]
pub struct ClientError {
    /// Raw result code, see [`NativeCode`]
    pub code: i32,
    /// Human-readable detail
    pub message: String,
}

impl ClientError {
    /// Create an error with a known code
    pub fn new(code: NativeCode, message: impl Into<String>) -> Self {
        ClientError {
            code: code.code(),
            message: message.into(),
        }
    }

    /// Create an error with a raw code, known or not
    pub fn from_raw(code: i32, message: impl Into<String>) -> Self {
        ClientError {
            code,
            message: message.into(),
        }
    }

    /// The known code, if any
    pub fn native_code(&self) -> Option<NativeCode> {
        NativeCode::from_code(self.code)
    }
}

/// Model-level errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// User key cannot be hashed into a digest
    #[error("invalid user key: {0}")]
    InvalidKey(String),
}
