//! Custom error types for the common library
//!
//! This module defines infrastructure error types that can be used
//! throughout the application.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Error type for outbound mail delivery
#[derive(Error, Debug)]
pub enum MailError {
    /// The message could not be assembled for the transport
    #[error("Failed to build email: {0}")]
    Build(String),

    /// The transport rejected or failed to deliver the message
    #[error("Failed to send email: {0}")]
    Delivery(String),
}
