//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap Diesel-specific errors and convert
//! them to the database-agnostic error types defined in `subtrack_core`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use subtrack_core::errors::{DatabaseError, Error};
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `subtrack_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A core error raised inside a write job. Passed back to the caller untouched.
    #[error(transparent)]
    Core(Error),
}

/// Lets write jobs return core errors through the transaction wrapper.
impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Core(err)
    }
}

impl StorageError {
    /// Converts to a core error, attributing persistence faults to `operation`.
    pub fn into_core_error(self, operation: &str) -> Error {
        match self {
            StorageError::Core(err) => err,
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::NotFound(format!("record not found while trying to {}", operation))
            }
            other => Error::persistence(operation, other.into_database_error()),
        }
    }

    fn into_database_error(self) -> DatabaseError {
        match self {
            StorageError::ConnectionFailed(e) => DatabaseError::ConnectionFailed(e.to_string()),
            StorageError::PoolError(e) => DatabaseError::PoolCreationFailed(e.to_string()),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => DatabaseError::UniqueViolation(info.message().to_string()),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => DatabaseError::ForeignKeyViolation(info.message().to_string()),
            StorageError::QueryFailed(e) => DatabaseError::QueryFailed(e.to_string()),
            StorageError::MigrationFailed(e) => DatabaseError::MigrationFailed(e),
            StorageError::Core(e) => DatabaseError::Internal(e.to_string()),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        err.into_core_error("access the database")
    }
}

/// Extension trait for converting Diesel and r2d2 Results to core Results.
///
/// Every persistence fault carries the operation it interrupted, e.g.
/// `.into_core("create subscription")` yields
/// "failed to create subscription: ...".
pub trait IntoCore<T> {
    fn into_core(self, operation: &str) -> subtrack_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self, operation: &str) -> subtrack_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into_core_error(operation))
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self, operation: &str) -> subtrack_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into_core_error(operation))
    }
}

impl<T> IntoCore<T> for std::result::Result<T, diesel::ConnectionError> {
    fn into_core(self, operation: &str) -> subtrack_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into_core_error(operation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtrack_core::errors::ValidationError;

    #[test]
    fn test_not_found_maps_to_core_not_found() {
        let err =
            StorageError::QueryFailed(DieselError::NotFound).into_core_error("get subscription");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_query_failure_carries_operation() {
        let result: std::result::Result<(), DieselError> = Err(DieselError::RollbackTransaction);
        let err = result.into_core("create subscription").unwrap_err();
        assert!(err.is_persistence());
        assert!(err.to_string().starts_with("failed to create subscription: "));
    }

    #[test]
    fn test_core_error_passes_through_unchanged() {
        let core = Error::Validation(ValidationError::MissingField("start_date".into()));
        let back = StorageError::from(core).into_core_error("update subscription");
        assert!(matches!(
            back,
            Error::Validation(ValidationError::MissingField(ref f)) if f == "start_date"
        ));
    }
}
