//! Subtrack Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for tracking user subscriptions.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod errors;
pub mod subscriptions;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
