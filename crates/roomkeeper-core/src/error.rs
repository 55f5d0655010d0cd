//! Core error types for roomkeeper-core.
//!
//! Operator-facing validation failures live in [`GameError`]; they are
//! surfaced verbatim to whoever triggered the action and never retried.
//! Storage and configuration failures have their own enums and are wrapped
//! by [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Failures caused by an operator action that the game rules reject.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Hint code is not in the dictionary
    #[error("invalid code: no hint registered under '{code}'")]
    NotFound { code: String },

    /// No consumable hint uses remain
    #[error("maximum {max} hint uses reached")]
    QuotaExceeded { max: u32 },

    /// Admin-only action attempted without an active admin session
    #[error("admin session required")]
    Forbidden,

    /// The one hint add allowed per admin session has been spent
    #[error("only one hint may be added per admin session; log in again to add another")]
    AddQuotaExhausted,

    /// Add collides with an existing code
    #[error("a hint with code '{code}' already exists")]
    DuplicateCode { code: String },

    /// Admin secret mismatch
    #[error("invalid admin code")]
    InvalidCode,

    /// Required text field blank on add
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    /// Action switched off by policy
    #[error("{action} is disabled by configuration")]
    Disabled { action: &'static str },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Could not determine or create the data directory
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// A persisted slot that failed to parse or validate.
///
/// Never propagated past the loader: it is logged and the slot falls back
/// to its compiled-in default.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("slot '{key}' is corrupt: {message}")]
    Corrupt { key: &'static str, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Core error type for roomkeeper-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected operator action
    #[error(transparent)]
    Game(#[from] GameError),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// The game-rule failure behind this error, if any.
    pub fn as_game(&self) -> Option<&GameError> {
        match self {
            CoreError::Game(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
