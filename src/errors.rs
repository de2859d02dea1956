//! Shared error types used across submodules.

use std::io;

use thiserror::Error;

/// Top-level error type for the field library.
#[derive(Debug, Error)]
pub enum FieldError {
    /// Raised for non-positive counts or radii, zero grid dimensions and
    /// non-finite inputs.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Raised for coincident endpoints and overlapping inductance pairs.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// Wraps allocation and file failures.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl FieldError {
    /// Shorthand for [`FieldError::InvalidParameter`].
    pub(crate) fn parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Shorthand for [`FieldError::InvalidGeometry`].
    pub(crate) fn geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// True for failures the driver cannot recover from by skipping a command.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Resource(_))
    }
}

impl From<io::Error> for FieldError {
    fn from(err: io::Error) -> Self {
        Self::Resource(ResourceError::Io(err))
    }
}

/// Allocation, transfer and file failures.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Output storage could not be reserved.
    #[error("failed to allocate storage for {elements} elements")]
    Allocation {
        /// Number of elements requested.
        elements: usize,
    },
    /// Underlying I/O failure.
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    /// A persisted file could not be parsed.
    #[error("malformed file at line {line}: {reason}")]
    Format {
        /// 1-based line number of the offending record.
        line: usize,
        /// Description of the problem.
        reason: String,
    },
}
