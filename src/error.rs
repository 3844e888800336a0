//! Error types for the state store.

use crate::types::MemberKind;
use thiserror::Error;

/// Main error type for state store operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// A snapshot entry's recorded member kind disagrees with the kind the
    /// restoring component declares for that slot. Signals a defect in the
    /// capture path, not a normal runtime condition.
    #[error(
        "Unsupported member kind for {declared_by}::{name}: snapshot has {snapshot:?}, component declares {declared:?}"
    )]
    UnsupportedMemberKind {
        declared_by: String,
        name: String,
        snapshot: MemberKind,
        declared: MemberKind,
    },

    /// A snapshot entry matches no preserved member on the restoring
    /// component. Restoring into an incompatible component type is a caller
    /// contract violation; the store fails fast instead of writing a
    /// partial, possibly-mismatched subset.
    #[error("No preserved member {declared_by}::{name} on restoring component")]
    UnknownMember { declared_by: String, name: String },

    /// A captured value could not be written back into the member slot.
    #[error("Type mismatch writing {declared_by}::{name}: {reason}")]
    TypeMismatch {
        declared_by: String,
        name: String,
        reason: String,
    },

    /// Reading a member value failed during capture.
    #[error("Failed to capture {declared_by}::{name}: {reason}")]
    Capture {
        declared_by: String,
        name: String,
        reason: String,
    },
}

/// Result type for state store operations.
pub type Result<T> = std::result::Result<T, StateError>;
