//! Users directory.
//!
//! Create, update, delete and list users behind the `UsersDirectoryApi`
//! contract. The domain layer owns validation, the update-mask projection and
//! the page token protocol; storage, hashing and event delivery are pluggable.

#![forbid(unsafe_code)]

pub use users_directory_sdk::{
    ErrorKind, ListUsersRequest, NewUser, Password, UpdateUserRequest, User, UserField,
    UserFilter, UserUpdate, UsersDirectoryApi, UsersDirectoryError, UsersPage,
};

pub mod api;
pub mod config;
pub mod domain;
pub mod infra;
pub mod local_client;
pub mod module;

#[cfg(test)]
pub mod test_support;

pub use config::UsersDirectoryConfig;
pub use local_client::UsersDirectoryLocalClient;
pub use module::UsersDirectory;
