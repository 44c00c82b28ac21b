use std::fmt;

use async_trait::async_trait;
use users_directory_sdk::Password;

use crate::domain::error::DomainError;
use crate::domain::events::UserEvent;

/// Output port: publish user lifecycle events.
///
/// The service awaits the call but never lets its failure escape.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &UserEvent) -> anyhow::Result<()>;
}

/// Plaintext going in, hash coming out.
///
/// `hash` is write-only from the caller's perspective: it is filled by
/// [`PasswordHasher::generate_hash`] and handed to storage, never returned.
#[derive(Clone)]
pub struct PasswordDetails {
    pub password: Password,
    pub hash: Option<String>,
}

impl PasswordDetails {
    #[must_use]
    pub fn new(password: Password) -> Self {
        Self {
            password,
            hash: None,
        }
    }

    #[must_use]
    pub fn with_hash(password: Password, hash: impl Into<String>) -> Self {
        Self {
            password,
            hash: Some(hash.into()),
        }
    }
}

impl fmt::Debug for PasswordDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDetails")
            .field("password", &self.password)
            .field("hash", &self.hash.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Output port: password hashing algorithm.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Fill `details.hash` from `details.password`.
    async fn generate_hash(&self, details: &mut PasswordDetails) -> Result<(), DomainError>;

    /// Check `details.password` against `details.hash`.
    ///
    /// A mismatch is [`DomainError::PasswordMismatch`].
    async fn verify(&self, details: &PasswordDetails) -> Result<(), DomainError>;
}
