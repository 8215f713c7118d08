//! Error types for loading crawl input and configuration.
//!
//! The analysis itself never fails; errors only come from the I/O edge.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeoScopeError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid crawl input in {origin}: {message}")]
    InvalidInput { origin: String, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no issue page {0}")]
    PageOutOfRange(usize),
}

impl SeoScopeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeoScopeError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_input(origin: impl Into<String>, message: impl Into<String>) -> Self {
        SeoScopeError::InvalidInput {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeoScopeError>;
