//! Users Directory SDK
//!
//! Public contract of the users directory:
//! - `UsersDirectoryApi` trait
//! - Model types (`User`, `NewUser`, `UserUpdate`, `UserFilter`, ...)
//! - The closed error taxonomy (`UsersDirectoryError`, `ErrorKind`)
//!
//! ## Usage
//!
//! ```ignore
//! use users_directory_sdk::{ListUsersRequest, UsersDirectoryApi};
//!
//! let page = client.list_users(ListUsersRequest::default()).await?;
//! if let Some(token) = page.next_page_token {
//!     let next = client.list_users(ListUsersRequest::continue_from(token)).await?;
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod errors;
pub mod models;
pub mod password;

pub use api::UsersDirectoryApi;
pub use errors::{ErrorKind, UsersDirectoryError};
pub use models::{
    ListUsersRequest, NewUser, UpdateUserRequest, User, UserField, UserFilter, UserUpdate,
    UsersPage,
};
pub use password::Password;
