//! Local implementation of `UsersDirectoryApi`.
//!
//! Used for in-process callers. Delegates to the domain service and converts
//! errors to SDK error types.

use std::sync::Arc;

use async_trait::async_trait;
use users_directory_sdk::{
    ListUsersRequest, NewUser, UpdateUserRequest, User, UsersDirectoryApi, UsersDirectoryError,
    UsersPage,
};
use uuid::Uuid;

use crate::domain::service::Service;

pub struct UsersDirectoryLocalClient {
    service: Arc<Service>,
}

impl UsersDirectoryLocalClient {
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UsersDirectoryApi for UsersDirectoryLocalClient {
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersDirectoryError> {
        self.service.create_user(new_user).await.map_err(Into::into)
    }

    async fn update_user(&self, req: UpdateUserRequest) -> Result<User, UsersDirectoryError> {
        self.service
            .update_user(req.id, req.update)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), UsersDirectoryError> {
        self.service.delete_user(id).await.map_err(Into::into)
    }

    async fn list_users(&self, req: ListUsersRequest) -> Result<UsersPage, UsersDirectoryError> {
        self.service.list_users(req).await.map_err(Into::into)
    }
}
