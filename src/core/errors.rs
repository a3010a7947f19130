//! Custom error types for translation operations

use std::sync::Arc;
use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Service rejected the API key (401)
    #[error("Invalid API key: {message}")]
    InvalidKey {
        /// Reason text
        message: String,
    },

    /// API key has been blocked (402)
    #[error("Blocked API key: {message}")]
    BlockedKey {
        /// Reason text
        message: String,
    },

    /// Daily limit on translated text exceeded (404)
    #[error("Exceeded the daily limit on the amount of translated text: {message}")]
    DailyLimitExceeded {
        /// Reason text
        message: String,
    },

    /// Any other non-success status
    #[error("API error: {status} - {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Reason text
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// Reason text
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        /// Reason text
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Reason text
        message: String,
    },
}

/// Coarse classification of a [`TranslationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 401
    InvalidKey,
    /// 402
    BlockedKey,
    /// 404
    DailyLimitExceeded,
    /// Any other non-success status
    UnexpectedStatus,
    /// Connection, timeout or body read failure
    Transport,
    /// Undecodable or misaligned success body
    InvalidResponse,
    /// Invalid configuration
    Config,
}

impl TranslationError {
    /// Map a non-success HTTP status onto the service's documented errors
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => TranslationError::InvalidKey { message },
            402 => TranslationError::BlockedKey { message },
            404 => TranslationError::DailyLimitExceeded { message },
            _ => TranslationError::UnexpectedStatus { status, message },
        }
    }

    /// Classification used to tell failures apart without matching fields
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslationError::InvalidKey { .. } => ErrorKind::InvalidKey,
            TranslationError::BlockedKey { .. } => ErrorKind::BlockedKey,
            TranslationError::DailyLimitExceeded { .. } => ErrorKind::DailyLimitExceeded,
            TranslationError::UnexpectedStatus { .. } => ErrorKind::UnexpectedStatus,
            TranslationError::NetworkError { .. } => ErrorKind::Transport,
            TranslationError::InvalidResponseError { .. } => ErrorKind::InvalidResponse,
            TranslationError::ConfigError { .. } => ErrorKind::Config,
        }
    }

    /// HTTP status carried by the error, if it came from the service
    pub fn status(&self) -> Option<u16> {
        match self {
            TranslationError::InvalidKey { .. } => Some(401),
            TranslationError::BlockedKey { .. } => Some(402),
            TranslationError::DailyLimitExceeded { .. } => Some(404),
            TranslationError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        TranslationError::NetworkError {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::ConfigError {
            message: err.to_string(),
        }
    }
}

/// Failure marker yielded in place of each item of a batch that failed.
///
/// Every item of the same batch shares one underlying error.
#[derive(Error, Debug, Clone)]
#[error("batch {batch} ({size} items) failed: {error}")]
pub struct BatchError {
    /// Zero-based index of the failed batch
    pub batch: usize,
    /// Number of items submitted in that batch
    pub size: usize,
    /// Failure shared by every item of the batch
    #[source]
    pub error: Arc<TranslationError>,
}

impl BatchError {
    /// Kind of the shared underlying error
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
