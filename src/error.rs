//! Crate-wide error types.

use thiserror::Error;

use crate::config::SettingsError;
use crate::exec::WarehouseError;

/// Result type for statement composition and execution.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while composing or executing statements.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested statement cannot be composed from its inputs.
    #[error("cannot compose statement: {0}")]
    Composition(String),

    /// The row-count probe failed. The wrapped probe SQL is attached.
    #[error("row-count probe failed: {message}")]
    Probe {
        /// Warehouse error message.
        message: String,
        /// The probe statement that failed.
        sql: String,
    },

    /// The query itself failed. The prepared SQL is attached.
    #[error("query execution failed: {message}")]
    Execution {
        /// Warehouse error message.
        message: String,
        /// The statement that failed.
        sql: String,
    },

    /// Error from the warehouse session boundary.
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    /// Error loading configuration.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
