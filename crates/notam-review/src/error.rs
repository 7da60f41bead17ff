//! Error types for notam-review.
//!
//! This module defines all error types used throughout the notam-review crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for notam-review operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset & Store Errors ===
    /// The reference dataset file does not exist and no download URL is configured.
    #[error("reference dataset not found at {path} and no dataset URL is configured")]
    DatasetMissing {
        /// Expected path of the dataset file.
        path: PathBuf,
    },

    /// A CSV read or write failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row index was outside the record collection.
    #[error("row index {index} is out of range (collection has {len} records)")]
    RowOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of records in the collection.
        len: usize,
    },

    /// A username failed validation.
    #[error("invalid username '{name}': use lowercase letters, digits, '-', '_' or '.'")]
    InvalidUsername {
        /// The rejected username.
        name: String,
    },

    /// No feedback file exists for the given user.
    #[error("no feedback file for user '{user}' at {path}")]
    UserFileMissing {
        /// The username.
        user: String,
        /// Expected path of the feedback file.
        path: PathBuf,
    },

    // === Record Errors ===
    /// An impact level string did not match the fixed four-level set.
    #[error("invalid impact level '{value}' (expected Low, Medium, High or Critical)")]
    InvalidImpactLevel {
        /// The rejected value.
        value: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Remote Errors ===
    /// Downloading the reference dataset failed.
    #[error("failed to download dataset from {url}: {message}")]
    Download {
        /// The URL that was requested.
        url: String,
        /// Description of what went wrong.
        message: String,
    },

    /// Uploading a feedback file failed.
    #[error("failed to upload feedback: {message}")]
    Upload {
        /// Description of what went wrong.
        message: String,
    },

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for notam-review operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a new upload error.
    #[must_use]
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }

    /// Create a new download error.
    #[must_use]
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error indicates a row index past the end of the collection.
    #[must_use]
    pub fn is_row_out_of_range(&self) -> bool {
        matches!(self, Self::RowOutOfRange { .. })
    }

    /// Check if this error indicates a missing user feedback file.
    #[must_use]
    pub fn is_user_file_missing(&self) -> bool {
        matches!(self, Self::UserFileMissing { .. })
    }
}
