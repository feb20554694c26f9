//! Database error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Broad category of a database failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DbErrorKind {
    /// Connection, migration or query failure.
    #[display("query")]
    Query,
    /// Requested row does not exist.
    #[display("not found")]
    NotFound,
    /// Unique constraint or stale version.
    #[display("conflict")]
    Conflict,
    /// Stored value could not be decoded.
    #[display("corrupt row")]
    Corrupt,
    /// Input rejected before reaching the database.
    #[display("invalid input")]
    Invalid,
}

/// Database error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates a new query error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(DbErrorKind::Query, message)
    }

    /// Creates an error of the given kind with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn with_kind(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True when the write lost a race or hit a unique constraint.
    pub fn is_conflict(&self) -> bool {
        self.kind == DbErrorKind::Conflict
    }

    /// True when the row was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == DbErrorKind::NotFound
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::NotFound => Self::with_kind(DbErrorKind::NotFound, "Row not found"),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::with_kind(DbErrorKind::Conflict, info.message().to_string())
            }
            other => Self::new(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("Connection error: {}", err))
    }
}
