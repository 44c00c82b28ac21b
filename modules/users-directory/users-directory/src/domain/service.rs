use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};
use users_directory_sdk::{ListUsersRequest, NewUser, User, UserUpdate, UsersPage};
use uuid::Uuid;

use crate::config::UsersDirectoryConfig;
use crate::domain::error::DomainError;
use crate::domain::events::UserEvent;
use crate::domain::page_token::{PageRequest, PageToken};
use crate::domain::patch::UserPatch;
use crate::domain::ports::{EventPublisher, PasswordDetails, PasswordHasher};
use crate::domain::repo::{NewUserRecord, UsersRepository};
use crate::domain::validation::Validator;

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_page_size: u32,
    pub storage_timeout: Duration,
    pub event_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_page_size: 10,
            storage_timeout: Duration::from_secs(10),
            event_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&UsersDirectoryConfig> for ServiceConfig {
    fn from(cfg: &UsersDirectoryConfig) -> Self {
        Self {
            max_page_size: cfg.max_page_size,
            storage_timeout: cfg.storage_timeout,
            event_timeout: cfg.event_timeout,
        }
    }
}

/// Domain service with business rules for the users directory.
///
/// Holds no mutable state; collaborators are shared handles that must be safe
/// for concurrent use.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
    events: Arc<dyn EventPublisher>,
    validator: Validator,
    config: ServiceConfig,
}

impl Service {
    /// Create a service with dependencies.
    #[must_use]
    pub fn new(
        repo: Arc<dyn UsersRepository>,
        hasher: Arc<dyn PasswordHasher>,
        events: Arc<dyn EventPublisher>,
        validator: Validator,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            hasher,
            events,
            validator,
            config,
        }
    }

    /// # Errors
    /// `InvalidArgument` on bad input, `AlreadyExists` on a duplicate nickname
    /// or email, `Internal` when hashing or storage fails.
    #[instrument(skip(self, new_user), fields(nickname = %new_user.nickname))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        self.validator.validate_new_user(&new_user)?;

        let NewUser {
            first_name,
            last_name,
            nickname,
            email,
            country,
            password,
        } = new_user;

        let mut details = PasswordDetails::new(password);
        self.hasher
            .generate_hash(&mut details)
            .await
            .map_err(hashing_failure)?;
        let password_hash = details.hash.take().ok_or_else(|| {
            DomainError::password_hash(anyhow::anyhow!("hasher produced no hash"))
        })?;

        let now = now_utc();
        let record = NewUserRecord {
            id: Uuid::now_v7(),
            first_name,
            last_name,
            nickname,
            email,
            country,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let user = self
            .storage("create", self.repo.create(record))
            .await?
            .ok_or(DomainError::MissingRecord {
                operation: "create",
            })?;

        info!(user_id = %user.id, "Successfully created user");
        self.emit(UserEvent::created(&user, now_utc())).await;
        Ok(user)
    }

    /// # Errors
    /// `InvalidArgument` when the mask names no known field or a masked value
    /// is invalid, `NotFound`, `AlreadyExists`, or `Internal`.
    #[instrument(skip(self, update), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<User, DomainError> {
        info!("Updating user");

        let patch = UserPatch::from_mask(&update)?;
        self.validator.validate_patch(&patch)?;
        let patch = patch.with_updated_at(now_utc());

        let user = self
            .storage("update", self.repo.update(id, patch))
            .await?
            .ok_or(DomainError::MissingRecord {
                operation: "update",
            })?;

        info!("Successfully updated user");
        self.emit(UserEvent::updated(&user, update.update_mask, now_utc()))
            .await;
        Ok(user)
    }

    /// # Errors
    /// `NotFound` when no user has this ID (including a second delete).
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting user");

        self.storage("delete", self.repo.delete(id)).await?;

        info!("Successfully deleted user");
        self.emit(UserEvent::deleted(id, now_utc())).await;
        Ok(())
    }

    /// # Errors
    /// `InvalidArgument` for an out-of-range page size or a malformed token.
    #[instrument(skip(self, req), fields(page_size = req.page_size))]
    pub async fn list_users(&self, req: ListUsersRequest) -> Result<UsersPage, DomainError> {
        debug!("Listing users");

        let size = self.effective_page_size(req.page_size)?;
        let (filter, offset) = match req.page_token.as_deref() {
            Some(token) if !token.is_empty() => {
                let token = PageToken::decode(token)?;
                (token.filter, token.offset)
            }
            _ => (req.filter, 0),
        };

        let page = PageRequest {
            filter,
            offset,
            size,
        };
        let users = self
            .storage("list", self.repo.list(&page.filter, page.window()))
            .await?;

        debug!(count = users.len(), offset, "Fetched users window");
        page.finish(users)
    }

    /// `0` selects the maximum; anything negative or above it is rejected.
    fn effective_page_size(&self, requested: i32) -> Result<u64, DomainError> {
        let max = self.config.max_page_size;
        match u32::try_from(requested) {
            Ok(0) => Ok(u64::from(max)),
            Ok(n) if n <= max => Ok(u64::from(n)),
            _ => Err(DomainError::PageSizeOutOfRange {
                got: requested,
                max,
            }),
        }
    }

    /// Bound a storage call by the configured timeout.
    async fn storage<T, F>(&self, operation: &'static str, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        if let Ok(result) = tokio::time::timeout(self.config.storage_timeout, call).await {
            result
        } else {
            warn!(operation, "Storage call timed out");
            Err(DomainError::Timeout { operation })
        }
    }

    /// Best effort: failures are logged and never returned.
    async fn emit(&self, event: UserEvent) {
        let kind = event.kind.as_str();
        match tokio::time::timeout(self.config.event_timeout, self.events.publish(&event)).await {
            Ok(Ok(())) => debug!(event = kind, "Emitted user event"),
            Ok(Err(e)) => {
                warn!(event = kind, user_id = %event.user_id, error = %e, "Failed to emit user event (continuing)");
            }
            Err(_) => {
                warn!(event = kind, user_id = %event.user_id, "Timed out emitting user event (continuing)");
            }
        }
    }
}

fn hashing_failure(e: DomainError) -> DomainError {
    match e {
        DomainError::PasswordHash { .. } => e,
        other => DomainError::password_hash(other),
    }
}

/// Current UTC time at microsecond precision, which every storage backend keeps.
fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - time::Duration::nanoseconds(i64::from(now.nanosecond() % 1_000))
}
