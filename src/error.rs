// Error types for certnotify
//
// One structured error enum for the whole crate. Failures are reported
// through logs by the driver; these variants carry enough context for
// those log lines to be useful.

use std::io;
use thiserror::Error;

/// Main error type for certnotify operations
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Database connectivity or query errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Invalid or missing configuration
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Message building or SMTP errors
    #[error("Email error: {0}")]
    EmailError(String),

    /// History log write or read failure
    #[error("History log error: {path}: {source}")]
    HistoryError {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Generic I/O error
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: io::Error,
    },

    /// File system errors with the offending path
    #[error("File system error: {path}: {source}")]
    FileSystemError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl NotifierError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        NotifierError::ConfigError {
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for NotifierError {
    fn from(err: toml::de::Error) -> Self {
        NotifierError::ConfigError {
            message: format!("Failed to parse TOML config: {}", err),
        }
    }
}

impl From<lettre::address::AddressError> for NotifierError {
    fn from(err: lettre::address::AddressError) -> Self {
        NotifierError::EmailError(format!("Email address error: {}", err))
    }
}

impl From<lettre::error::Error> for NotifierError {
    fn from(err: lettre::error::Error) -> Self {
        NotifierError::EmailError(format!("Message build error: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for NotifierError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        NotifierError::EmailError(format!("SMTP error: {}", err))
    }
}

impl From<tokio::task::JoinError> for NotifierError {
    fn from(err: tokio::task::JoinError) -> Self {
        NotifierError::Other(format!("Task join error: {}", err))
    }
}
