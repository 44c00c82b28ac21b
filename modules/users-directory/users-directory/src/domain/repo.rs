use async_trait::async_trait;
use time::OffsetDateTime;
use users_directory_sdk::{User, UserFilter};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::patch::UserPatch;

/// A fully prepared record: identity assigned, password already hashed.
#[derive(Clone)]
pub struct NewUserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl std::fmt::Debug for NewUserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUserRecord")
            .field("id", &self.id)
            .field("nickname", &self.nickname)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Offset + limit window over the stable `(created_at, id)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    pub offset: u64,
    pub limit: u64,
}

/// Persistence contract the service depends on.
///
/// Implementations must enforce nickname and email uniqueness
/// ([`DomainError::UserAlreadyExists`]) and report missing targets of
/// `update`/`delete` as [`DomainError::UserNotFound`].
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert and read back. `Ok(None)` means the record could not be read back.
    async fn create(&self, record: NewUserRecord) -> Result<Option<User>, DomainError>;

    /// Apply the present fields of `patch`. `Ok(None)` has the same meaning as for `create`.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, DomainError>;

    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;

    /// Users matching every present predicate, ordered by `created_at` then `id`.
    async fn list(&self, filter: &UserFilter, window: ListWindow)
    -> Result<Vec<User>, DomainError>;
}
