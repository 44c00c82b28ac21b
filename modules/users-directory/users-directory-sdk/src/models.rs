//! Public models for the users directory.
//!
//! These are transport-agnostic data structures that define the contract
//! between the users directory and its consumers.

use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::password::Password;

/// A user record as returned to callers. The password hash never leaves storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Data for creating a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    pub password: Password,
}

/// Fields a partial update may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    FirstName,
    LastName,
    Nickname,
    Email,
    Country,
}

impl UserField {
    pub const ALL: [Self; 5] = [
        Self::FirstName,
        Self::LastName,
        Self::Nickname,
        Self::Email,
        Self::Country,
    ];

    /// Wire name used in update masks.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Nickname => "nickname",
            Self::Email => "email",
            Self::Country => "country",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a mask entry names no known field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUserField(pub String);

impl fmt::Display for UnknownUserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown user field '{}'", self.0)
    }
}

impl std::error::Error for UnknownUserField {}

impl FromStr for UserField {
    type Err = UnknownUserField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownUserField(s.to_owned()))
    }
}

/// Partial update input.
///
/// The `update_mask` is authoritative: only the fields it names are written,
/// so an empty string named in the mask clears a field while a populated value
/// left out of the mask is ignored. Unknown mask entries are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    pub update_mask: Vec<String>,
}

/// Request to update a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    pub update: UserUpdate,
}

/// Equality predicates for listing. `None` means "don't filter".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
}

/// Request for one page of users.
///
/// `page_size == 0` selects the service maximum. A non-empty `page_token`
/// replaces `filter` with the filter the token was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListUsersRequest {
    pub filter: UserFilter,
    pub page_size: i32,
    pub page_token: Option<String>,
}

impl ListUsersRequest {
    #[must_use]
    pub fn new(filter: UserFilter, page_size: i32) -> Self {
        Self {
            filter,
            page_size,
            page_token: None,
        }
    }

    /// Follow-up request for the page a previous call pointed at.
    #[must_use]
    pub fn continue_from(page_token: impl Into<String>) -> Self {
        Self {
            page_token: Some(page_token.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }
}

/// One page of users in stable creation order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UsersPage {
    pub users: Vec<User>,
    /// Present only when more users follow.
    pub next_page_token: Option<String>,
}
