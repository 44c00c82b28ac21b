//! Composition root: builds the service from configuration and exposes the
//! in-process client and the REST router.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use users_directory_sdk::UsersDirectoryApi;

use crate::api::rest::routes;
use crate::config::UsersDirectoryConfig;
use crate::domain::repo::UsersRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::domain::validation::{ValidationRules, Validator};
use crate::infra::events::BroadcastEventPublisher;
use crate::infra::password::BcryptPasswordHasher;
use crate::infra::storage::{InMemoryUsersRepository, SeaOrmUsersRepository};
use crate::local_client::UsersDirectoryLocalClient;

/// Where users are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// SeaORM connection described by `database.dsn`.
    Database,
    /// Process memory; contents are lost on exit.
    Memory,
}

pub struct UsersDirectory {
    client: Arc<dyn UsersDirectoryApi>,
    events: BroadcastEventPublisher,
}

impl UsersDirectory {
    /// Wire storage, hashing, events and validation from `cfg`.
    ///
    /// # Errors
    /// Fails when the database cannot be reached or migrated.
    pub async fn init(cfg: &UsersDirectoryConfig, backend: StorageBackend) -> anyhow::Result<Self> {
        let repo: Arc<dyn UsersRepository> = match backend {
            StorageBackend::Database => Arc::new(
                SeaOrmUsersRepository::connect(&cfg.database)
                    .await
                    .context("initialize users storage")?,
            ),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory users storage; data will not survive a restart");
                Arc::new(InMemoryUsersRepository::new())
            }
        };
        Self::with_repository(cfg, repo)
    }

    /// Build around an existing repository.
    ///
    /// # Errors
    /// Fails if the validator cannot be built.
    pub fn with_repository(
        cfg: &UsersDirectoryConfig,
        repo: Arc<dyn UsersRepository>,
    ) -> anyhow::Result<Self> {
        let events = BroadcastEventPublisher::new(cfg.event_channel_capacity);
        let validator = Validator::new(ValidationRules {
            min_password_length: cfg.min_password_length,
            max_field_length: cfg.max_field_length,
        })?;

        let service = Service::new(
            repo,
            Arc::new(BcryptPasswordHasher::new(cfg.bcrypt_cost)),
            Arc::new(events.clone()),
            validator,
            ServiceConfig::from(cfg),
        );
        let client: Arc<dyn UsersDirectoryApi> =
            Arc::new(UsersDirectoryLocalClient::new(Arc::new(service)));

        tracing::info!(
            max_page_size = cfg.max_page_size,
            "Users directory initialized"
        );
        Ok(Self { client, events })
    }

    #[must_use]
    pub fn client(&self) -> Arc<dyn UsersDirectoryApi> {
        self.client.clone()
    }

    #[must_use]
    pub fn events(&self) -> &BroadcastEventPublisher {
        &self.events
    }

    /// REST routes under `/users-directory/v1`.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.client.clone(), self.events.clone())
    }
}
