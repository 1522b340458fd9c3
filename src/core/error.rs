//! Error types and error handling for the site indexer.
//!
//! Every fatal condition of a run maps onto one variant here. Components
//! return these through [`Result`]; only the binary decides to log and
//! terminate.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for siteidx operations
pub type Result<T> = std::result::Result<T, SiteidxError>;

/// Main error type for the site indexer
#[derive(Error, Debug)]
pub enum SiteidxError {
    #[error("Content build failed at {}: {message}", path.display())]
    CorpusBuild { path: PathBuf, message: String },

    #[error("Failed to open index at {}: {message}", path.display())]
    IndexOpen { path: PathBuf, message: String },

    #[error("Failed to create index at {}: {message}", path.display())]
    IndexCreate { path: PathBuf, message: String },

    #[error("Failed to index document '{key}': {message}")]
    IndexWrite { key: String, message: String },

    #[error("Failed to close index at {}: {message}", path.display())]
    IndexClose { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl SiteidxError {
    pub fn corpus(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::CorpusBuild {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn open(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::IndexOpen {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn create(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::IndexCreate {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    pub fn write(key: &str, message: impl ToString) -> Self {
        Self::IndexWrite {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub fn close(path: impl AsRef<Path>, message: impl ToString) -> Self {
        Self::IndexClose {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Name of the stage that failed, for log context
    pub fn operation(&self) -> &'static str {
        match self {
            SiteidxError::CorpusBuild { .. } => "build",
            SiteidxError::IndexOpen { .. } => "open",
            SiteidxError::IndexCreate { .. } => "create",
            SiteidxError::IndexWrite { .. } => "write",
            SiteidxError::IndexClose { .. } => "close",
            SiteidxError::ConfigError(_) | SiteidxError::TomlError(_) => "config",
            SiteidxError::IoError(_) => "io",
        }
    }

    /// Check if the failure came from the persistent index
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            SiteidxError::IndexOpen { .. }
                | SiteidxError::IndexCreate { .. }
                | SiteidxError::IndexWrite { .. }
                | SiteidxError::IndexClose { .. }
        )
    }
}
