use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use users_directory_sdk::{
    ListUsersRequest, NewUser, Password, User, UserFilter, UserUpdate, UsersPage,
};
use uuid::Uuid;

use crate::domain::events::UserEvent;

/// REST DTO for user representation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub email: String,
    pub country: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// REST DTO for creating a new user. Not `Debug`: it holds the plaintext password.
#[derive(Clone, Deserialize)]
pub struct CreateUserReq {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub password: String,
}

/// REST DTO for a partial update. Only fields named in `update_mask` are applied.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUserReq {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub update_mask: Vec<String>,
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListUsersQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub country: Option<String>,
    pub page_size: Option<i32>,
    pub page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPageDto {
    pub users: Vec<UserDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Server-sent user lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEventDto {
    pub event_type: String,
    #[serde(with = "time::serde::rfc3339")]
    pub event_time: OffsetDateTime,
    pub user_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_mask: Vec<String>,
}

// Conversion implementations between REST DTOs and contract models
impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            email: user.email,
            country: user.country,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            nickname: req.nickname,
            email: req.email,
            country: req.country,
            password: Password::from(req.password),
        }
    }
}

impl From<UpdateUserReq> for UserUpdate {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            nickname: req.nickname,
            email: req.email,
            country: req.country,
            update_mask: req.update_mask,
        }
    }
}

impl From<ListUsersQuery> for ListUsersRequest {
    fn from(q: ListUsersQuery) -> Self {
        Self {
            filter: UserFilter {
                first_name: q.first_name,
                last_name: q.last_name,
                country: q.country,
            },
            page_size: q.page_size.unwrap_or(0),
            page_token: q.page_token,
        }
    }
}

impl From<UsersPage> for UsersPageDto {
    fn from(page: UsersPage) -> Self {
        Self {
            users: page.users.into_iter().map(UserDto::from).collect(),
            next_page_token: page.next_page_token,
        }
    }
}

impl From<&UserEvent> for UserEventDto {
    fn from(e: &UserEvent) -> Self {
        let user = e.user.as_ref();
        Self {
            event_type: e.kind.as_str().to_owned(),
            event_time: e.at,
            user_id: e.user_id,
            first_name: user.map(|u| u.first_name.clone()),
            last_name: user.map(|u| u.last_name.clone()),
            nickname: user.map(|u| u.nickname.clone()),
            email: user.map(|u| u.email.clone()),
            country: user.map(|u| u.country.clone()),
            created_at: user.map(|u| u.created_at),
            updated_at: user.map(|u| u.updated_at),
            event_mask: e.mask.clone(),
        }
    }
}
