use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::ports::{PasswordDetails, PasswordHasher};

/// bcrypt-backed [`PasswordHasher`]. Work runs on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn generate_hash(&self, details: &mut PasswordDetails) -> Result<(), DomainError> {
        if details.password.is_empty() {
            return Err(DomainError::validation("password", "is required"));
        }

        let password = details.password.clone();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password.expose(), cost))
            .await
            .map_err(DomainError::password_hash)?
            .map_err(DomainError::password_hash)?;

        details.hash = Some(hash);
        Ok(())
    }

    async fn verify(&self, details: &PasswordDetails) -> Result<(), DomainError> {
        let Some(hash) = details.hash.clone() else {
            return Err(DomainError::PasswordMismatch);
        };

        let password = details.password.clone();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password.expose(), &hash))
            .await
            .map_err(DomainError::password_hash)?
            .map_err(DomainError::password_hash)?;

        if matched {
            Ok(())
        } else {
            Err(DomainError::PasswordMismatch)
        }
    }
}
