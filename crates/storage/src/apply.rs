//! Write-policy checks and operation application
//!
//! Pure functions over `StoredRecord`; the client wraps them in a shard
//! entry lock so a check and its write are atomic per record.

use kvcompat_core::{
    Bin, BinSelection, ClientError, ClientResult, GenerationPolicy, NativeCode, Operation, Record,
    RecordExistsAction, Value, WritePolicy,
};

use crate::stored_record::{expiry_from_ttl, StoredRecord};

/// What a write does after its policy checks pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Apply to the current version
    Apply,
    /// Keep the result as an additional duplicate version
    Duplicate,
}

/// Outcome of executing an operation list
#[derive(Debug)]
pub struct Outcome {
    /// New stored state; `None` leaves the store untouched
    pub state: Option<StoredRecord>,
    /// Record returned to the caller
    pub record: Record,
}

/// Check existence and generation rules for a write against `existing`.
pub fn check_write(existing: Option<&StoredRecord>, policy: &WritePolicy) -> ClientResult<Disposition> {
    match (policy.record_exists_action, existing) {
        (RecordExistsAction::CreateOnly, Some(_)) => {
            return Err(ClientError::new(NativeCode::KeyExists, "record already exists"));
        }
        (RecordExistsAction::UpdateOnly | RecordExistsAction::ReplaceOnly, None) => {
            return Err(ClientError::new(NativeCode::KeyNotFound, "record does not exist"));
        }
        _ => {}
    }

    // Generation checks only constrain existing records
    let Some(record) = existing else {
        return Ok(Disposition::Apply);
    };
    let expected = policy.generation;
    match policy.generation_policy {
        GenerationPolicy::None => Ok(Disposition::Apply),
        GenerationPolicy::ExpectGenEqual if record.generation == expected => Ok(Disposition::Apply),
        GenerationPolicy::ExpectGenEqual => Err(generation_error(expected, record.generation)),
        GenerationPolicy::ExpectGenGreaterOrEqual if record.generation >= expected => {
            Ok(Disposition::Apply)
        }
        GenerationPolicy::ExpectGenGreaterOrEqual => {
            Err(generation_error(expected, record.generation))
        }
        GenerationPolicy::DuplicateOnMismatch if record.generation == expected => {
            Ok(Disposition::Apply)
        }
        GenerationPolicy::DuplicateOnMismatch => Ok(Disposition::Duplicate),
    }
}

fn generation_error(expected: u32, actual: u32) -> ClientError {
    ClientError::new(
        NativeCode::GenerationError,
        format!("generation mismatch: expected {}, stored {}", expected, actual),
    )
}

/// Execute `operations` against `existing`.
///
/// Writes run first in order, then reads project the post-write record.
/// `max_record_size` bounds the resulting stored size.
pub fn execute(
    existing: Option<&StoredRecord>,
    set_name: &str,
    policy: &WritePolicy,
    operations: &[Operation],
    max_record_size: usize,
) -> ClientResult<Outcome> {
    let has_writes = operations.iter().any(Operation::is_write);

    if existing.is_none() && operations.contains(&Operation::Touch) {
        return Err(ClientError::new(NativeCode::KeyNotFound, "cannot touch a missing record"));
    }

    let state = if has_writes {
        let disposition = check_write(existing, policy)?;
        let mut next = existing
            .cloned()
            .unwrap_or_else(|| StoredRecord::empty(set_name));
        next.corrupted = false;

        let mut bins = match (disposition, policy.record_exists_action) {
            (Disposition::Duplicate, _) => next.bins.clone(),
            (_, RecordExistsAction::Replace | RecordExistsAction::ReplaceOnly) => Default::default(),
            _ => std::mem::take(&mut next.bins),
        };
        for op in operations {
            apply_write(&mut bins, op)?;
        }
        match disposition {
            Disposition::Apply => next.bins = bins,
            Disposition::Duplicate => next.duplicates.push(bins),
        }
        next.generation = next.generation.wrapping_add(1).max(1);
        next.expiration = expiry_from_ttl(policy.expiration);

        let size = next.estimated_size();
        if size > max_record_size {
            return Err(ClientError::new(
                NativeCode::RecordTooBig,
                format!("record size {} exceeds limit {}", size, max_record_size),
            ));
        }
        Some(next)
    } else {
        None
    };

    let current = state.as_ref().or(existing).ok_or_else(|| {
        ClientError::new(NativeCode::KeyNotFound, "record does not exist")
    })?;
    let record = current.to_record(&read_selection(operations));
    Ok(Outcome { state, record })
}

/// Bins the read operations of a list ask for
fn read_selection(operations: &[Operation]) -> BinSelection {
    let mut names = Vec::new();
    for op in operations {
        match op {
            Operation::ReadAll => return BinSelection::All,
            Operation::Read(name) => names.push(name.clone()),
            _ => {}
        }
    }
    if names.is_empty() {
        BinSelection::None
    } else {
        BinSelection::Named(names)
    }
}

fn apply_write(bins: &mut kvcompat_core::BinMap, op: &Operation) -> ClientResult<()> {
    match op {
        Operation::Write(Bin { name, value }) => {
            if value.is_null() {
                bins.remove(name);
            } else {
                bins.insert(name.clone(), value.clone());
            }
        }
        Operation::Append(bin) => concat(bins, bin, false)?,
        Operation::Prepend(bin) => concat(bins, bin, true)?,
        Operation::Add(bin) => add(bins, bin)?,
        // Touch only affects expiration, set for every write
        Operation::Touch
        | Operation::Read(_)
        | Operation::ReadAll
        | Operation::ReadHeader => {}
    }
    Ok(())
}

fn concat(bins: &mut kvcompat_core::BinMap, bin: &Bin, front: bool) -> ClientResult<()> {
    if !matches!(bin.value, Value::String(_) | Value::Bytes(_)) {
        return Err(ClientError::new(
            NativeCode::ParameterError,
            format!("cannot append {} value", bin.value.type_name()),
        ));
    }
    let merged = match (bins.get(&bin.name), &bin.value) {
        (None, value) => value.clone(),
        (Some(Value::String(old)), Value::String(new)) => Value::String(if front {
            format!("{}{}", new, old)
        } else {
            format!("{}{}", old, new)
        }),
        (Some(Value::Bytes(old)), Value::Bytes(new)) => {
            let (head, tail) = if front { (new, old) } else { (old, new) };
            let mut joined = Vec::with_capacity(head.len() + tail.len());
            joined.extend_from_slice(head);
            joined.extend_from_slice(tail);
            Value::Bytes(joined)
        }
        (Some(old), new) => return Err(bin_type_error(&bin.name, old, new)),
    };
    bins.insert(bin.name.clone(), merged);
    Ok(())
}

fn add(bins: &mut kvcompat_core::BinMap, bin: &Bin) -> ClientResult<()> {
    if !matches!(bin.value, Value::Int(_) | Value::Float(_)) {
        return Err(ClientError::new(
            NativeCode::ParameterError,
            format!("cannot add {} value", bin.value.type_name()),
        ));
    }
    let sum = match (bins.get(&bin.name), &bin.value) {
        (None, value) => value.clone(),
        (Some(Value::Int(old)), Value::Int(delta)) => Value::Int(old.wrapping_add(*delta)),
        (Some(Value::Float(old)), Value::Float(delta)) => Value::Float(old + delta),
        (Some(old), new) => return Err(bin_type_error(&bin.name, old, new)),
    };
    bins.insert(bin.name.clone(), sum);
    Ok(())
}

fn bin_type_error(name: &str, old: &Value, new: &Value) -> ClientError {
    ClientError::new(
        NativeCode::BinTypeError,
        format!(
            "bin '{}' holds {}, operand is {}",
            name,
            old.type_name(),
            new.type_name()
        ),
    )
}
