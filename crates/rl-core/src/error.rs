//! Error types
//!
//! Neither of these ever reaches the host page as a failure: storage errors
//! are logged and absorbed by the callers, and configuration errors are only
//! raised at construction time.

use crate::types::Scope;

/// Error type for storage access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Write denied: scope={scope}, key={key}")]
    Denied { scope: Scope, key: String },
    #[error("Quota exceeded: scope={scope}, key={key}")]
    QuotaExceeded { scope: Scope, key: String },
}

/// Error type for limiter configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("Failed to parse config: {0}")]
    Parse(String),
}
