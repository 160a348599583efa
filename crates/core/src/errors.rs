//! Core error types for the subscription tracker.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the subscription tracker.
///
/// The transport layer maps each variant to a wire status; nothing in this
/// type carries transport semantics itself.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("failed to {operation}: {source}")]
    Persistence {
        operation: String,
        #[source]
        source: DatabaseError,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Wraps a storage fault with the operation that was being attempted.
    pub fn persistence(operation: impl Into<String>, source: DatabaseError) -> Self {
        Error::Persistence {
            operation: operation.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// True for malformed date text, the only error raised by the date normalizer.
    pub fn is_invalid_format(&self) -> bool {
        matches!(
            self,
            Error::Validation(ValidationError::InvalidFormat { .. })
        )
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence { .. })
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and date parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid {field}: {source}")]
    InvalidFormat {
        field: &'static str,
        #[source]
        source: DateFormatError,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

/// Reasons a date string is rejected by the billing-month normalizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("invalid month: {0}")]
    InvalidMonth(String),

    #[error("invalid calendar date: {0}")]
    InvalidDate(String),

    #[error("invalid date format: {0}")]
    UnrecognizedFormat(String),
}
