// src/error.rs

//! Unified error handling for the watcher application.

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL construction failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error (missing credentials, unusable settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Source document retrieval failed
    #[error("Fetch error for {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    /// Source payload not in an expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Notification dispatch failed
    #[error("Notify error: HTTP {status}")]
    Notify { status: u16 },

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error from an HTTP status.
    pub fn fetch(url: impl Into<String>, status: reqwest::StatusCode) -> Self {
        Self::Fetch {
            url: url.into(),
            status: status.as_u16(),
        }
    }

    /// Create a notify error from an HTTP status.
    pub fn notify(status: reqwest::StatusCode) -> Self {
        Self::Notify {
            status: status.as_u16(),
        }
    }
}
