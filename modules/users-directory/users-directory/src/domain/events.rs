use time::OffsetDateTime;
use users_directory_sdk::User;
use uuid::Uuid;

/// Lifecycle transition of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserEventKind {
    Created,
    Updated,
    Deleted,
}

impl UserEventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// Transport-agnostic domain event.
///
/// `user` holds the record state after the transition and is `None` for
/// deletes. `mask` is the caller's update mask and is empty unless the event
/// is an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEvent {
    pub kind: UserEventKind,
    pub at: OffsetDateTime,
    pub user_id: Uuid,
    pub user: Option<User>,
    pub mask: Vec<String>,
}

impl UserEvent {
    #[must_use]
    pub fn created(user: &User, at: OffsetDateTime) -> Self {
        Self {
            kind: UserEventKind::Created,
            at,
            user_id: user.id,
            user: Some(user.clone()),
            mask: Vec::new(),
        }
    }

    #[must_use]
    pub fn updated(user: &User, mask: Vec<String>, at: OffsetDateTime) -> Self {
        Self {
            kind: UserEventKind::Updated,
            at,
            user_id: user.id,
            user: Some(user.clone()),
            mask,
        }
    }

    #[must_use]
    pub fn deleted(user_id: Uuid, at: OffsetDateTime) -> Self {
        Self {
            kind: UserEventKind::Deleted,
            at,
            user_id,
            user: None,
            mask: Vec::new(),
        }
    }
}
