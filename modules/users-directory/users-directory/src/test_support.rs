#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use users_directory_sdk::{NewUser, Password, User, UserFilter};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::events::UserEvent;
use crate::domain::patch::UserPatch;
use crate::domain::ports::{EventPublisher, PasswordDetails, PasswordHasher};
use crate::domain::repo::{ListWindow, NewUserRecord, UsersRepository};
use crate::domain::service::{Service, ServiceConfig};
use crate::domain::validation::{ValidationRules, Validator};
use crate::infra::storage::InMemoryUsersRepository;

/// Collects every published event.
#[derive(Default)]
pub struct RecordingEventPublisher {
    pub events: Mutex<Vec<UserEvent>>,
}

impl RecordingEventPublisher {
    pub fn take(&self) -> Vec<UserEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: &UserEvent) -> anyhow::Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Always fails, counting attempts.
#[derive(Default)]
pub struct FailingEventPublisher {
    pub attempts: Mutex<usize>,
}

#[async_trait]
impl EventPublisher for FailingEventPublisher {
    async fn publish(&self, _event: &UserEvent) -> anyhow::Result<()> {
        *self.attempts.lock() += 1;
        anyhow::bail!("broker unavailable")
    }
}

/// Reversible "hash" so tests can see what reached storage.
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn generate_hash(&self, details: &mut PasswordDetails) -> Result<(), DomainError> {
        details.hash = Some(format!("plain:{}", details.password.expose()));
        Ok(())
    }

    async fn verify(&self, details: &PasswordDetails) -> Result<(), DomainError> {
        let expected = format!("plain:{}", details.password.expose());
        if details.hash.as_deref() == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(DomainError::PasswordMismatch)
        }
    }
}

pub struct FailingPasswordHasher;

#[async_trait]
impl PasswordHasher for FailingPasswordHasher {
    async fn generate_hash(&self, _details: &mut PasswordDetails) -> Result<(), DomainError> {
        Err(DomainError::validation("password", "engine refused input"))
    }

    async fn verify(&self, _details: &PasswordDetails) -> Result<(), DomainError> {
        Err(DomainError::PasswordMismatch)
    }
}

/// Storage whose writes succeed without a record to return.
pub struct NullRecordRepository;

#[async_trait]
impl UsersRepository for NullRecordRepository {
    async fn create(&self, _record: NewUserRecord) -> Result<Option<User>, DomainError> {
        Ok(None)
    }

    async fn update(&self, _id: Uuid, _patch: UserPatch) -> Result<Option<User>, DomainError> {
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        Ok(())
    }

    async fn list(
        &self,
        _filter: &UserFilter,
        _window: ListWindow,
    ) -> Result<Vec<User>, DomainError> {
        Ok(Vec::new())
    }
}

/// Storage that never answers within any reasonable timeout.
pub struct StalledRepository;

#[async_trait]
impl UsersRepository for StalledRepository {
    async fn create(&self, _record: NewUserRecord) -> Result<Option<User>, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn update(&self, _id: Uuid, _patch: UserPatch) -> Result<Option<User>, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(None)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }

    async fn list(
        &self,
        _filter: &UserFilter,
        _window: ListWindow,
    ) -> Result<Vec<User>, DomainError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

/// Records the windows and filters storage was asked for.
#[derive(Default)]
pub struct SpyRepository {
    pub inner: InMemoryUsersRepository,
    pub lists: Mutex<Vec<(UserFilter, ListWindow)>>,
    pub updates: Mutex<Vec<UserPatch>>,
}

#[async_trait]
impl UsersRepository for SpyRepository {
    async fn create(&self, record: NewUserRecord) -> Result<Option<User>, DomainError> {
        self.inner.create(record).await
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, DomainError> {
        self.updates.lock().push(patch.clone());
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.inner.delete(id).await
    }

    async fn list(
        &self,
        filter: &UserFilter,
        window: ListWindow,
    ) -> Result<Vec<User>, DomainError> {
        self.lists.lock().push((filter.clone(), window));
        self.inner.list(filter, window).await
    }
}

pub fn validator() -> Validator {
    Validator::new(ValidationRules::default()).unwrap()
}

pub fn service_with(
    repo: Arc<dyn UsersRepository>,
    hasher: Arc<dyn PasswordHasher>,
    events: Arc<dyn EventPublisher>,
) -> Service {
    Service::new(repo, hasher, events, validator(), ServiceConfig::default())
}

pub fn new_user(nickname: &str) -> NewUser {
    NewUser {
        first_name: "Test".to_owned(),
        last_name: "User".to_owned(),
        nickname: nickname.to_owned(),
        email: format!("{nickname}@example.com"),
        country: "NL".to_owned(),
        password: Password::new("s3cure-pass"),
    }
}
