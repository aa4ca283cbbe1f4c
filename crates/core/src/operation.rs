//! Per-record operations for the `operate` primitive

use crate::types::Bin;

/// Single step of a multi-operation command.
///
/// Writes are applied in order, then reads observe the post-write record.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Set a bin; a `Null` value removes it
    Write(Bin),
    /// Append to a string or bytes bin
    Append(Bin),
    /// Prepend to a string or bytes bin
    Prepend(Bin),
    /// Add to an integer or float bin
    Add(Bin),
    /// Reset the record's expiration from the policy
    Touch,
    /// Read one bin
    Read(String),
    /// Read all bins
    ReadAll,
    /// Read generation and expiration only
    ReadHeader,
}

impl Operation {
    /// Whether this operation modifies the record
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::Write(_)
                | Operation::Append(_)
                | Operation::Prepend(_)
                | Operation::Add(_)
                | Operation::Touch
        )
    }
}

/// Which bins a read returns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BinSelection {
    /// All bins
    #[default]
    All,
    /// Only the named bins
    Named(Vec<String>),
    /// Metadata only
    None,
}

impl BinSelection {
    /// Select a list of names
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BinSelection::Named(names.into_iter().map(Into::into).collect())
    }

    /// Whether a bin passes the selection
    pub fn includes(&self, name: &str) -> bool {
        match self {
            BinSelection::All => true,
            BinSelection::Named(names) => names.iter().any(|n| n == name),
            BinSelection::None => false,
        }
    }
}
