//! Update-mask projection.
//!
//! The mask decides which fields are written. A value outside the mask is
//! dropped even when non-empty, and an empty string inside the mask is a real
//! value that clears the field.

use time::OffsetDateTime;
use users_directory_sdk::{UserField, UserUpdate};

use crate::domain::error::DomainError;

/// Present-or-absent value per mutable field, as handed to storage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub updated_at: Option<OffsetDateTime>,
}

impl UserPatch {
    /// Project `update` onto the fields its mask names.
    ///
    /// # Errors
    /// [`DomainError::EmptyUpdateMask`] when no mask entry names a known field.
    pub fn from_mask(update: &UserUpdate) -> Result<Self, DomainError> {
        let mut patch = Self::default();
        for entry in &update.update_mask {
            let Ok(field) = entry.parse::<UserField>() else {
                tracing::debug!(field = %entry, "Ignoring unknown update mask entry");
                continue;
            };
            match field {
                UserField::FirstName => patch.first_name = Some(update.first_name.clone()),
                UserField::LastName => patch.last_name = Some(update.last_name.clone()),
                UserField::Nickname => patch.nickname = Some(update.nickname.clone()),
                UserField::Email => patch.email = Some(update.email.clone()),
                UserField::Country => patch.country = Some(update.country.clone()),
            }
        }

        if patch.is_empty() {
            return Err(DomainError::EmptyUpdateMask);
        }
        Ok(patch)
    }

    #[must_use]
    pub fn with_updated_at(mut self, at: OffsetDateTime) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// True when no user field is present. `updated_at` alone does not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Fields present in the patch, in declaration order.
    #[must_use]
    pub fn fields(&self) -> Vec<UserField> {
        UserField::ALL
            .into_iter()
            .filter(|f| self.value(*f).is_some())
            .collect()
    }

    #[must_use]
    pub fn value(&self, field: UserField) -> Option<&str> {
        match field {
            UserField::FirstName => self.first_name.as_deref(),
            UserField::LastName => self.last_name.as_deref(),
            UserField::Nickname => self.nickname.as_deref(),
            UserField::Email => self.email.as_deref(),
            UserField::Country => self.country.as_deref(),
        }
    }
}
