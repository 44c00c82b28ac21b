//! Public error types for the users directory.
//!
//! These errors are safe to expose to other modules and consumers.

use std::fmt;

use thiserror::Error;

/// The closed set of semantic error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidArgument,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::InvalidArgument => "invalid_argument",
            Self::Internal => "internal",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can be returned by the `UsersDirectoryApi`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersDirectoryError {
    /// The addressed user does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// A user with the same nickname or email already exists.
    #[error("Already exists: {message}")]
    AlreadyExists { message: String },

    /// The request was rejected before reaching storage.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An internal error occurred. Details are logged, not exposed.
    #[error("Internal error")]
    Internal,

    /// An error that could not be classified.
    #[error("Unknown error: {message}")]
    Unknown { message: String },
}

impl UsersDirectoryError {
    /// Create a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an `AlreadyExists` error.
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an `Internal` error.
    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }

    /// Create an `Unknown` error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Internal => ErrorKind::Internal,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }
}
