use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use time::OffsetDateTime;
use users_directory_sdk::User;
use uuid::Uuid;

use crate::domain::patch::UserPatch;
use crate::domain::repo::NewUserRecord;
use crate::infra::storage::entity::{ActiveModel, Model};

impl From<Model> for User {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            nickname: m.nickname,
            email: m.email,
            country: m.country,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Epoch microseconds, the fixed-width form `created_at` is sorted by.
#[must_use]
pub fn epoch_micros(t: OffsetDateTime) -> i64 {
    i64::try_from(t.unix_timestamp_nanos() / 1_000).unwrap_or(i64::MAX)
}

impl From<NewUserRecord> for ActiveModel {
    fn from(r: NewUserRecord) -> Self {
        Self {
            id: Set(r.id),
            first_name: Set(r.first_name),
            last_name: Set(r.last_name),
            nickname: Set(r.nickname),
            email: Set(r.email),
            country: Set(r.country),
            password_hash: Set(r.password_hash),
            created_at: Set(r.created_at),
            created_at_us: Set(epoch_micros(r.created_at)),
            updated_at: Set(r.updated_at),
        }
    }
}

/// Active model touching only the columns present in `patch`.
pub fn patch_to_active_model(id: Uuid, patch: UserPatch) -> ActiveModel {
    fn opt<T: Into<sea_orm::Value>>(v: Option<T>) -> sea_orm::ActiveValue<T> {
        v.map_or(NotSet, Set)
    }

    ActiveModel {
        id: Unchanged(id),
        first_name: opt(patch.first_name),
        last_name: opt(patch.last_name),
        nickname: opt(patch.nickname),
        email: opt(patch.email),
        country: opt(patch.country),
        password_hash: NotSet,
        created_at: NotSet,
        created_at_us: NotSet,
        updated_at: opt(patch.updated_at),
    }
}
