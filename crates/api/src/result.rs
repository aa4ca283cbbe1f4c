//! Legacy result model
//!
//! Every facade call returns an [`OperationResult`]: a fixed result code
//! plus a uniform bin-map payload.

use std::fmt;

use kvcompat_core::{BinMap, Value};
use serde::{Deserialize, Serialize};

/// Legacy result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResultCode {
    /// Success
    Ok,
    /// No call has populated the result
    #[default]
    NotSet,
    /// Generic server failure
    ServerError,
    /// Timed out
    Timeout,
    /// Failure inside the client
    ClientError,
    /// Record not found
    KeyNotFound,
    /// Generation check failed
    GenerationMismatch,
    /// Invalid input
    ParameterError,
    /// Record already exists
    KeyExists,
    /// Bin already exists
    BinExists,
    /// Value could not be serialized
    SerializeError,
    /// Cluster key changed during the operation
    ClusterKeyMismatch,
    /// Server out of memory
    ServerMemError,
    /// Feature not available on the server
    FeatureUnavailable,
    /// No server reachable or server overloaded
    ServerNotAvailable,
    /// Bin operation on an incompatible type
    BinTypeError,
    /// Record exceeds the size limit
    RecordTooBig,
    /// Record is busy
    KeyBusy,
}

impl ResultCode {
    /// Every result code
    pub const ALL: [ResultCode; 18] = [
        ResultCode::Ok,
        ResultCode::NotSet,
        ResultCode::ServerError,
        ResultCode::Timeout,
        ResultCode::ClientError,
        ResultCode::KeyNotFound,
        ResultCode::GenerationMismatch,
        ResultCode::ParameterError,
        ResultCode::KeyExists,
        ResultCode::BinExists,
        ResultCode::SerializeError,
        ResultCode::ClusterKeyMismatch,
        ResultCode::ServerMemError,
        ResultCode::FeatureUnavailable,
        ResultCode::ServerNotAvailable,
        ResultCode::BinTypeError,
        ResultCode::RecordTooBig,
        ResultCode::KeyBusy,
    ];

    /// Whether this is `Ok`
    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Outcome of one facade call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationResult {
    /// Result code
    pub result_code: ResultCode,
    /// Record generation, `None` until a call reports one
    pub generation: Option<u32>,
    /// Requested bin value for single-bin calls
    pub single_value: Option<Value>,
    /// Bins by name; absent when duplicates are returned
    pub values_by_name: Option<BinMap>,
    /// Conflicting versions, current first
    pub duplicate_versions: Option<Vec<BinMap>>,
    /// A scan skipped records that failed an integrity check
    pub data_corrupted: bool,
}

impl OperationResult {
    /// Result carrying only a code
    pub fn with_code(result_code: ResultCode) -> Self {
        OperationResult {
            result_code,
            ..Default::default()
        }
    }

    /// Successful result without payload
    pub fn ok() -> Self {
        Self::with_code(ResultCode::Ok)
    }

    /// Whether the call succeeded
    pub fn is_ok(&self) -> bool {
        self.result_code.is_ok()
    }

    /// Look up a bin in `values_by_name`
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values_by_name.as_ref().and_then(|bins| bins.get(name))
    }
}
