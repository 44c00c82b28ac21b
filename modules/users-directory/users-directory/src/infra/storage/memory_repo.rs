use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use users_directory_sdk::{User, UserFilter};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::patch::UserPatch;
use crate::domain::repo::{ListWindow, NewUserRecord, UsersRepository};

struct StoredUser {
    user: User,
    password_hash: String,
}

/// Process-local [`UsersRepository`] with the same uniqueness, not-found and
/// ordering rules as the database backend.
#[derive(Default)]
pub struct InMemoryUsersRepository {
    users: RwLock<HashMap<Uuid, StoredUser>>,
}

impl InMemoryUsersRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }

    /// Stored hash for a user, for credential checks.
    #[must_use]
    pub fn password_hash(&self, id: Uuid) -> Option<String> {
        self.users.read().get(&id).map(|s| s.password_hash.clone())
    }
}

fn conflicts(
    users: &HashMap<Uuid, StoredUser>,
    except: Option<Uuid>,
    nickname: Option<&str>,
    email: Option<&str>,
) -> bool {
    users.values().any(|s| {
        Some(s.user.id) != except
            && (nickname == Some(s.user.nickname.as_str()) || email == Some(s.user.email.as_str()))
    })
}

fn matches(filter: &UserFilter, user: &User) -> bool {
    filter.first_name.as_deref().is_none_or(|v| v == user.first_name)
        && filter.last_name.as_deref().is_none_or(|v| v == user.last_name)
        && filter.country.as_deref().is_none_or(|v| v == user.country)
}

#[async_trait]
impl UsersRepository for InMemoryUsersRepository {
    async fn create(&self, record: NewUserRecord) -> Result<Option<User>, DomainError> {
        let mut users = self.users.write();
        if users.contains_key(&record.id)
            || conflicts(
                &users,
                None,
                Some(record.nickname.as_str()),
                Some(record.email.as_str()),
            )
        {
            return Err(DomainError::UserAlreadyExists);
        }

        let user = User {
            id: record.id,
            first_name: record.first_name,
            last_name: record.last_name,
            nickname: record.nickname,
            email: record.email,
            country: record.country,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: record.password_hash,
            },
        );
        Ok(Some(user))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut users = self.users.write();
        if !users.contains_key(&id) {
            return Err(DomainError::user_not_found(id));
        }
        if conflicts(
            &users,
            Some(id),
            patch.nickname.as_deref(),
            patch.email.as_deref(),
        ) {
            return Err(DomainError::UserAlreadyExists);
        }

        let Some(stored) = users.get_mut(&id) else {
            return Err(DomainError::user_not_found(id));
        };
        let user = &mut stored.user;
        if let Some(v) = patch.first_name {
            user.first_name = v;
        }
        if let Some(v) = patch.last_name {
            user.last_name = v;
        }
        if let Some(v) = patch.nickname {
            user.nickname = v;
        }
        if let Some(v) = patch.email {
            user.email = v;
        }
        if let Some(v) = patch.country {
            user.country = v;
        }
        if let Some(at) = patch.updated_at {
            user.updated_at = at;
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.users
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn list(
        &self,
        filter: &UserFilter,
        window: ListWindow,
    ) -> Result<Vec<User>, DomainError> {
        let users = self.users.read();
        let mut found: Vec<&User> = users
            .values()
            .map(|s| &s.user)
            .filter(|u| matches(filter, u))
            .collect();
        found.sort_by_key(|u| (u.created_at, u.id));

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        Ok(found
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
