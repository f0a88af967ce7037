//! Error types for the directory operations.

use std::fmt;

use crate::db::DbError;

/// Errors surfaced by [`crate::Directory`] operations. Invalid optional
/// parameters never reach this type; they are dropped during sanitization.
#[derive(Debug)]
pub enum DirectoryError {
    /// The requested institution, snapshot, or organization does not exist.
    NotFound(String),
    /// The backing store failed; fatal for the request.
    StoreUnavailable(DbError),
    /// A required parameter was missing or failed sanitization.
    InvalidInput(String),
    /// Configuration could not be read or parsed.
    Config(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "Not found: {}", what),
            Self::StoreUnavailable(e) => write!(f, "Store unavailable: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StoreUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DbError> for DirectoryError {
    fn from(e: DbError) -> Self {
        Self::StoreUnavailable(e)
    }
}
