#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures for `users-directory` integration tests.

#![allow(dead_code)] // not every test binary uses every helper

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use users_directory::config::DatabaseConfig;
use users_directory::domain::error::DomainError;
use users_directory::domain::events::UserEvent;
use users_directory::domain::ports::{EventPublisher, PasswordDetails, PasswordHasher};
use users_directory::domain::service::{Service, ServiceConfig};
use users_directory::domain::validation::{ValidationRules, Validator};
use users_directory::infra::storage::SeaOrmUsersRepository;
use users_directory::{NewUser, Password, UsersDirectoryConfig};

/// Fresh, migrated in-memory `SQLite` repository. Each call is isolated.
///
/// # Panics
/// Panics if the connection or migrations fail.
pub async fn sqlite_repo() -> SeaOrmUsersRepository {
    SeaOrmUsersRepository::connect(&DatabaseConfig {
        dsn: "sqlite::memory:".to_owned(),
        max_connections: 1,
    })
    .await
    .expect("in-memory sqlite")
}

/// Stores `"plain:" + password`; keeps tests fast and deterministic.
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

#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<UserEvent>>,
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

/// Service over a fresh sqlite database with the given page limit.
pub async fn sqlite_service(
    max_page_size: u32,
) -> (Service, Arc<RecordingEventPublisher>) {
    let events = Arc::new(RecordingEventPublisher::default());
    let service = Service::new(
        Arc::new(sqlite_repo().await),
        Arc::new(PlainPasswordHasher),
        events.clone(),
        Validator::new(ValidationRules::default()).unwrap(),
        ServiceConfig {
            max_page_size,
            ..ServiceConfig::default()
        },
    );
    (service, events)
}

/// Module configuration tuned for tests: cheapest bcrypt cost.
pub fn test_config() -> UsersDirectoryConfig {
    UsersDirectoryConfig {
        bcrypt_cost: 4,
        ..UsersDirectoryConfig::default()
    }
}

pub fn new_user(nickname: &str, country: &str) -> NewUser {
    NewUser {
        first_name: "Test".to_owned(),
        last_name: nickname.to_uppercase(),
        nickname: nickname.to_owned(),
        email: format!("{nickname}@example.com"),
        country: country.to_owned(),
        password: Password::from("s3cure-pass"),
    }
}
