//! Typed error taxonomy for the data-access layer.
//!
//! Validation errors ([`DataError::EmptyInput`], [`DataError::Schema`]) are
//! raised before any I/O. Constraint violations are produced by the
//! translator in [`crate::violation`]; everything the translator cannot
//! classify passes through as an opaque [`DataError::Storage`].

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DataError>;

/// Typed error for all data-access operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// An operation that requires a matching row found none.
    #[error("no rows matched")]
    NotFound,

    /// A bulk operation received an empty payload (no rows, no ids, no
    /// changed fields).
    #[error("empty input for {0}")]
    EmptyInput(&'static str),

    /// Unknown column, relation, or otherwise invalid request shape.
    /// Detected before the statement is sent to the engine.
    #[error("schema error: {0}")]
    Schema(String),

    /// A required column received NULL.
    #[error("`{column}` cannot be NULL.")]
    NullViolation { column: String },

    /// Unique violation on the primary-key column.
    #[error("primary key conflict: {0}")]
    PrimaryKey(String),

    /// Unique violation on a non-key column.
    #[error("unique constraint violated: {0}")]
    Unique(String),

    /// Referential-integrity violation (insert of a dangling reference or
    /// delete of a referenced row).
    #[error("foreign key constraint violated: {0}")]
    ForeignKey(String),

    /// CHECK constraint violation.
    #[error("check constraint violated: {0}")]
    Check(String),

    /// Invalid configuration (DSN, pool knobs, limits).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Unclassified storage failure.
    #[error(transparent)]
    Storage(#[from] sea_orm::DbErr),
}

impl DataError {
    /// True for errors produced by a database integrity constraint.
    #[must_use]
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            DataError::NullViolation { .. }
                | DataError::PrimaryKey(_)
                | DataError::Unique(_)
                | DataError::ForeignKey(_)
                | DataError::Check(_)
        )
    }
}
