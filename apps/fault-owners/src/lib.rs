//! # fault-owners
//!
//! Library half of the owner lookup binary. Exposed as a library so that
//! integration tests can drive commands against an in-memory sink.

pub mod cli;
pub mod owners;
pub mod report;

use fault_core::{Fault, WriteError};
use thiserror::Error;

/// Errors surfaced by the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("output error: {0}")]
    Write(#[from] WriteError),

    /// A lookup failed. The fault was already printed.
    #[error("{0}")]
    Fault(Fault),
}

pub use cli::{Cli, Commands, execute, execute_to};
pub use owners::{KEY_NOT_FOUND, KeyNotFound, OwnerDirectory, key_not_found};
pub use report::FaultReport;
