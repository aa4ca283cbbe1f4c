//! Client result normalization
//!
//! Maps the client's record/absent/error outcomes onto [`OperationResult`].
//! The native code table is total: every `i32` maps to some legacy code,
//! unknown codes becoming `ServerError`.

use kvcompat_core::{ClientError, ClientResult, NativeCode, Record};
use tracing::debug;

use crate::result::{OperationResult, ResultCode};

impl From<NativeCode> for ResultCode {
    fn from(code: NativeCode) -> Self {
        match code {
            NativeCode::InvalidNode | NativeCode::ParseError => ResultCode::ClientError,
            NativeCode::SerializeError => ResultCode::SerializeError,
            NativeCode::ServerNotAvailable | NativeCode::DeviceOverload => {
                ResultCode::ServerNotAvailable
            }
            NativeCode::Ok => ResultCode::Ok,
            NativeCode::ServerError => ResultCode::ServerError,
            NativeCode::KeyNotFound => ResultCode::KeyNotFound,
            NativeCode::GenerationError => ResultCode::GenerationMismatch,
            NativeCode::ParameterError => ResultCode::ParameterError,
            NativeCode::KeyExists => ResultCode::KeyExists,
            NativeCode::BinExists => ResultCode::BinExists,
            NativeCode::ClusterKeyMismatch => ResultCode::ClusterKeyMismatch,
            NativeCode::ServerMemError => ResultCode::ServerMemError,
            NativeCode::Timeout => ResultCode::Timeout,
            NativeCode::NoXdr => ResultCode::FeatureUnavailable,
            NativeCode::BinTypeError => ResultCode::BinTypeError,
            NativeCode::RecordTooBig => ResultCode::RecordTooBig,
            NativeCode::KeyBusy => ResultCode::KeyBusy,
        }
    }
}

/// Map a raw client code to a legacy result code
pub fn result_code_for(code: i32) -> ResultCode {
    NativeCode::from_code(code)
        .map(ResultCode::from)
        .unwrap_or(ResultCode::ServerError)
}

/// Present record: bins and generation, or duplicate versions
pub fn from_record(record: Record) -> OperationResult {
    let mut result = OperationResult {
        generation: Some(record.generation),
        ..OperationResult::ok()
    };
    match record.duplicates {
        Some(versions) => result.duplicate_versions = Some(versions),
        None => result.values_by_name = Some(record.bins),
    }
    result
}

/// Write acknowledgement: generation only
pub fn from_header(record: &Record) -> OperationResult {
    OperationResult {
        generation: Some(record.generation),
        ..OperationResult::ok()
    }
}

/// Absent record
pub fn not_found() -> OperationResult {
    OperationResult::with_code(ResultCode::KeyNotFound)
}

/// Client error
pub fn from_error(err: &ClientError) -> OperationResult {
    let code = result_code_for(err.code);
    debug!(native = err.code, result = %code, error = %err.message, "client call failed");
    OperationResult::with_code(code)
}

/// Read outcome
pub fn from_read(outcome: ClientResult<Option<Record>>) -> OperationResult {
    match outcome {
        Ok(Some(record)) => from_record(record),
        Ok(None) => not_found(),
        Err(err) => from_error(&err),
    }
}

/// Operate outcome returning bins
pub fn from_operate(outcome: ClientResult<Record>) -> OperationResult {
    match outcome {
        Ok(record) => from_record(record),
        Err(err) => from_error(&err),
    }
}

/// Write outcome returning only the new generation
pub fn from_write(outcome: ClientResult<Record>) -> OperationResult {
    match outcome {
        Ok(record) => from_header(&record),
        Err(err) => from_error(&err),
    }
}

/// Existence check or delete outcome: `false` is KeyNotFound
pub fn from_found(outcome: ClientResult<bool>) -> OperationResult {
    match outcome {
        Ok(true) => OperationResult::ok(),
        Ok(false) => not_found(),
        Err(err) => from_error(&err),
    }
}

/// Copy `bin_name` into `single_value` of a successful result
pub fn with_single_value(mut result: OperationResult, bin_name: &str) -> OperationResult {
    if result.is_ok() {
        result.single_value = result.value(bin_name).cloned();
    }
    result
}
