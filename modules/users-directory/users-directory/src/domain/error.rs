use thiserror::Error;
use users_directory_sdk::{ErrorKind, UsersDirectoryError};
use uuid::Uuid;

/// Failure causes inside the users directory. Each maps onto exactly one
/// public [`ErrorKind`]; internal causes never leak their detail.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("no valid fields in update mask")]
    EmptyUpdateMask,

    #[error("page_size must be between 0 and {max}, got {got}")]
    PageSizeOutOfRange { got: i32, max: u32 },

    #[error("Invalid page token: {reason}")]
    InvalidPageToken { reason: String },

    #[error("Failed to encode page token: {0}")]
    PageTokenEncoding(#[source] serde_json::Error),

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("another user with same nickname or email already exists")]
    UserAlreadyExists,

    #[error("Password mismatch")]
    PasswordMismatch,

    #[error("Password hashing failed: {source}")]
    PasswordHash {
        #[source]
        source: anyhow::Error,
    },

    #[error("Database error: {source}")]
    Database {
        #[source]
        source: anyhow::Error,
    },

    #[error("Storage returned no record after {operation}")]
    MissingRecord { operation: &'static str },

    #[error("{operation} timed out")]
    Timeout { operation: &'static str },
}

impl DomainError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_page_token(reason: impl Into<String>) -> Self {
        Self::InvalidPageToken {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn database(source: impl Into<anyhow::Error>) -> Self {
        Self::Database {
            source: source.into(),
        }
    }

    pub fn password_hash(source: impl Into<anyhow::Error>) -> Self {
        Self::PasswordHash {
            source: source.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. }
            | Self::EmptyUpdateMask
            | Self::PageSizeOutOfRange { .. }
            | Self::InvalidPageToken { .. }
            | Self::PasswordMismatch => ErrorKind::InvalidArgument,
            Self::UserNotFound { .. } => ErrorKind::NotFound,
            Self::UserAlreadyExists => ErrorKind::AlreadyExists,
            Self::PasswordHash { .. }
            | Self::PageTokenEncoding(_)
            | Self::Database { .. }
            | Self::MissingRecord { .. }
            | Self::Timeout { .. } => ErrorKind::Internal,
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for UsersDirectoryError {
    fn from(e: DomainError) -> Self {
        match e.kind() {
            ErrorKind::InvalidArgument => Self::invalid_argument(e.to_string()),
            ErrorKind::NotFound => Self::not_found(e.to_string()),
            ErrorKind::AlreadyExists => Self::already_exists(e.to_string()),
            ErrorKind::Internal | ErrorKind::Unknown => {
                tracing::error!(error = ?e, "Internal error in users directory");
                Self::internal()
            }
        }
    }
}
