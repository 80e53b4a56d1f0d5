//! Error types for the workpad crate.
//!
//! The storage layer propagates [`StorageError`] with `?`; the action surface
//! absorbs those failures and reports them through the write reporter instead
//! of returning them to callers.

use thiserror::Error;

/// Errors raised by the durable store layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("database error: {0}")]
    DatabaseError(#[from] sled::Error),

    #[error("transaction failed: {0}")]
    TransactionError(String),

    #[error("failed to encode record: {0}")]
    EncodeError(String),

    #[error("failed to decode record: {0}")]
    DecodeError(String),
}

/// Errors raised outside the storage layer: configuration and collaborator
/// dispatch.
#[derive(Debug, Error)]
pub enum WorkpadError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("collaborator dispatch failed: {0}")]
    BridgeError(String),
}
