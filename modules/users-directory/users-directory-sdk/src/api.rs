//! `UsersDirectoryApi` trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::UsersDirectoryError;
use crate::models::{ListUsersRequest, NewUser, UpdateUserRequest, User, UsersPage};

/// Public API of the users directory.
///
/// Every failure is reported as exactly one [`ErrorKind`](crate::ErrorKind) of the
/// closed taxonomy, see [`UsersDirectoryError::kind`].
#[async_trait]
pub trait UsersDirectoryApi: Send + Sync {
    /// Create a new user. The password is hashed before it reaches storage.
    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersDirectoryError>;

    /// Update the fields named in the request's update mask.
    async fn update_user(&self, req: UpdateUserRequest) -> Result<User, UsersDirectoryError>;

    /// Delete a user by ID. Deleting a missing user is `NotFound`.
    async fn delete_user(&self, id: Uuid) -> Result<(), UsersDirectoryError>;

    /// List users, one page at a time.
    async fn list_users(&self, req: ListUsersRequest) -> Result<UsersPage, UsersDirectoryError>;
}
