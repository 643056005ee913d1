//! Error types for voucher-core

use thiserror::Error;

/// Result type alias using voucher-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in voucher-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// `SQLite` error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid input (malformed voucher batch)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A date cell or voucher date that cannot be interpreted
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Table store inconsistency
    #[error("Storage error: {0}")]
    Storage(String),
}
