//! Error types for offset extraction
//!
//! Every failure aborts the run. `OffsetError::kind` groups the variants into
//! the handful of categories a caller acts on, and each category carries the
//! process exit code the binary reports.

use std::fmt;
use std::path::PathBuf;

use gimli::DwTag;
use thiserror::Error;

use crate::debuginfo::entry::EntryLocation;

/// Result alias used across the crate
pub type Result<T, E = OffsetError> = std::result::Result<T, E>;

/// Errors produced while reading debug info or extracting offsets
#[derive(Debug, Error)]
pub enum OffsetError {
    /// The input path could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not an object file `object` recognizes
    #[error("{path} is not a recognized executable: {source}")]
    Container {
        path: PathBuf,
        #[source]
        source: object::Error,
    },

    /// The container has no usable `.debug_info` section
    #[error("{path} has no DWARF debug info")]
    MissingDebugInfo { path: PathBuf },

    /// No structured type with this name exists
    #[error("type {name} not found")]
    TypeNotFound { name: String },

    /// The container type has no member with this name
    #[error("member {member} not found in {container}")]
    MemberNotFound { container: String, member: String },

    /// An entry was found but carries the wrong tag for the next step
    #[error("{name} is {actual}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: DwTag,
        actual: DwTag,
    },

    /// A type reference points at no entry in the stream
    #[error("unresolved type reference to {0}")]
    UnresolvedReference(EntryLocation),

    /// The entry stream is malformed or truncated
    #[error("malformed debug info: {0}")]
    Stream(String),

    /// gimli rejected the DWARF data
    #[error("DWARF parse error: {0}")]
    Dwarf(#[from] gimli::Error),

    /// The result record could not be encoded
    #[error("cannot serialize offsets: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure category, as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable input or no debug info
    Container,
    /// A named type or member is absent
    NotFound,
    /// A tag did not match what the pipeline requires
    TypeMismatch,
    /// Malformed debug info or a dangling reference
    Stream,
    /// The finished record could not be encoded
    Serialization,
}

impl ErrorKind {
    /// Process exit code for this category
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Serialization => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Container => "container",
            ErrorKind::NotFound => "not found",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::Stream => "stream",
            ErrorKind::Serialization => "serialization",
        };
        f.write_str(name)
    }
}

impl OffsetError {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            OffsetError::Io { .. }
            | OffsetError::Container { .. }
            | OffsetError::MissingDebugInfo { .. } => ErrorKind::Container,
            OffsetError::TypeNotFound { .. } | OffsetError::MemberNotFound { .. } => {
                ErrorKind::NotFound
            }
            OffsetError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            OffsetError::UnresolvedReference(_) | OffsetError::Stream(_) | OffsetError::Dwarf(_) => {
                ErrorKind::Stream
            }
            OffsetError::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Shorthand for `kind().exit_code()`
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}
