//! # Indexed Vector Errors
//!
//! Format and decode failures are ordinary `eyre` reports. The three contract
//! violations a caller is expected to handle are raised as a typed
//! [`IndexedVectorError`] inside the report, so they can be told apart with
//! [`error_kind`] or `Report::downcast_ref`.
//!
//! | Kind | Raised by |
//! |------|-----------|
//! | `InvalidArgument` | null key on any lookup or mutation, record without a key |
//! | `KeyNotFound` | `get` for an absent key |
//! | `NotMutable` | any mutator on a frozen builder or a read-only view |
//!
//! None of these leave partial state behind: a failed call changes nothing.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexedVectorError {
    InvalidArgument { param: &'static str },
    KeyNotFound,
    NotMutable,
}

impl fmt::Display for IndexedVectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexedVectorError::InvalidArgument { param } => {
                write!(f, "invalid argument: '{}' must not be null", param)
            }
            IndexedVectorError::KeyNotFound => {
                write!(f, "the given key was not present in the indexed vector")
            }
            IndexedVectorError::NotMutable => {
                write!(f, "indexed vector is read-only and cannot be modified")
            }
        }
    }
}

impl std::error::Error for IndexedVectorError {}

/// Returns the contract error carried by `report`, if any.
pub fn error_kind(report: &eyre::Report) -> Option<&IndexedVectorError> {
    report.downcast_ref::<IndexedVectorError>()
}
