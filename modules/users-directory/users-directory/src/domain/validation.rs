use anyhow::Context;
use regex::Regex;
use users_directory_sdk::{NewUser, UserField};

use crate::domain::error::DomainError;
use crate::domain::patch::UserPatch;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$";

/// Rules applied to user input before anything reaches storage.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub min_password_length: usize,
    pub max_field_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_password_length: 8,
            max_field_length: 255,
        }
    }
}

/// Stateless input validator, built once and owned by the service.
#[derive(Debug, Clone)]
pub struct Validator {
    email: Regex,
    rules: ValidationRules,
}

impl Validator {
    /// # Errors
    /// Fails if the email grammar does not compile.
    pub fn new(rules: ValidationRules) -> anyhow::Result<Self> {
        let email = Regex::new(EMAIL_PATTERN).context("compile email grammar")?;
        Ok(Self { email, rules })
    }

    /// # Errors
    /// [`DomainError::Validation`] naming the first offending field.
    pub fn validate_new_user(&self, user: &NewUser) -> Result<(), DomainError> {
        self.check_length(UserField::FirstName, &user.first_name)?;
        self.check_length(UserField::LastName, &user.last_name)?;
        self.check_length(UserField::Country, &user.country)?;
        self.check_nickname(&user.nickname)?;
        self.check_email(&user.email)?;

        if user.password.is_empty() {
            return Err(DomainError::validation("password", "is required"));
        }
        if user.password.char_count() < self.rules.min_password_length {
            return Err(DomainError::validation(
                "password",
                format!(
                    "must be at least {} characters",
                    self.rules.min_password_length
                ),
            ));
        }
        Ok(())
    }

    /// Masked values obey the same rules as on creation.
    ///
    /// # Errors
    /// [`DomainError::Validation`] naming the first offending field.
    pub fn validate_patch(&self, patch: &UserPatch) -> Result<(), DomainError> {
        for field in patch.fields() {
            let value = patch.value(field).unwrap_or_default();
            match field {
                UserField::Nickname => self.check_nickname(value)?,
                UserField::Email => self.check_email(value)?,
                UserField::FirstName | UserField::LastName | UserField::Country => {
                    self.check_length(field, value)?;
                }
            }
        }
        Ok(())
    }

    fn check_nickname(&self, nickname: &str) -> Result<(), DomainError> {
        if nickname.trim().is_empty() {
            return Err(DomainError::validation("nickname", "is required"));
        }
        self.check_length(UserField::Nickname, nickname)
    }

    fn check_email(&self, email: &str) -> Result<(), DomainError> {
        if email.trim().is_empty() {
            return Err(DomainError::validation("email", "is required"));
        }
        self.check_length(UserField::Email, email)?;
        if !self.email.is_match(email) {
            return Err(DomainError::validation(
                "email",
                format!("'{email}' is not a valid address"),
            ));
        }
        Ok(())
    }

    fn check_length(&self, field: UserField, value: &str) -> Result<(), DomainError> {
        let len = value.chars().count();
        if len > self.rules.max_field_length {
            return Err(DomainError::validation(
                field.as_str(),
                format!(
                    "too long: {len} characters (max: {})",
                    self.rules.max_field_length
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use users_directory_sdk::{Password, UserUpdate};

    fn validator() -> Validator {
        Validator::new(ValidationRules::default()).unwrap()
    }

    fn new_user() -> NewUser {
        NewUser {
            first_name: "Grace".to_owned(),
            last_name: "Hopper".to_owned(),
            nickname: "grace".to_owned(),
            email: "grace@navy.mil".to_owned(),
            country: "US".to_owned(),
            password: Password::new("cobol-1959"),
        }
    }

    fn field_of(err: DomainError) -> String {
        match err {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_user() {
        validator().validate_new_user(&new_user()).unwrap();
    }

    #[test]
    fn names_and_country_may_be_empty() {
        let mut user = new_user();
        user.first_name.clear();
        user.last_name.clear();
        user.country.clear();
        validator().validate_new_user(&user).unwrap();
    }

    #[test]
    fn rejects_blank_nickname() {
        let mut user = new_user();
        user.nickname = "   ".to_owned();
        let err = validator().validate_new_user(&user).unwrap_err();
        assert_eq!(field_of(err), "nickname");
    }

    #[test]
    fn rejects_bad_emails() {
        for email in ["", "plain", "a@", "@b.com", "a b@c.com", "a@-b.com", "a@b..com"] {
            let mut user = new_user();
            user.email = email.to_owned();
            let err = validator().validate_new_user(&user).unwrap_err();
            assert_eq!(field_of(err), "email", "{email:?} should be rejected");
        }
    }

    #[test]
    fn accepts_common_email_shapes() {
        for email in ["a@b.co", "first.last+tag@sub.example.org", "x@localhost"] {
            let mut user = new_user();
            user.email = email.to_owned();
            validator().validate_new_user(&user).unwrap();
        }
    }

    #[test]
    fn enforces_password_policy() {
        let mut user = new_user();
        user.password = Password::new("");
        assert_eq!(
            field_of(validator().validate_new_user(&user).unwrap_err()),
            "password"
        );

        user.password = Password::new("1234567");
        assert_eq!(
            field_of(validator().validate_new_user(&user).unwrap_err()),
            "password"
        );

        user.password = Password::new("12345678");
        validator().validate_new_user(&user).unwrap();
    }

    #[test]
    fn enforces_max_field_length() {
        let v = Validator::new(ValidationRules {
            min_password_length: 1,
            max_field_length: 5,
        })
        .unwrap();
        let mut user = new_user();
        user.email = "a@b.c".to_owned();
        user.nickname = "nick".to_owned();
        user.first_name = "abcdef".to_owned();
        assert_eq!(field_of(v.validate_new_user(&user).unwrap_err()), "first_name");
    }

    #[test]
    fn validates_masked_fields_only() {
        let update = UserUpdate {
            email: "not-an-email".to_owned(),
            nickname: String::new(),
            country: "NZ".to_owned(),
            update_mask: vec!["country".to_owned()],
            ..UserUpdate::default()
        };
        let patch = UserPatch::from_mask(&update).unwrap();
        validator().validate_patch(&patch).unwrap();

        let update = UserUpdate {
            update_mask: vec!["email".to_owned()],
            ..update
        };
        let patch = UserPatch::from_mask(&update).unwrap();
        assert_eq!(field_of(validator().validate_patch(&patch).unwrap_err()), "email");
    }

    #[test]
    fn masked_nickname_must_not_be_blank() {
        let update = UserUpdate {
            update_mask: vec!["nickname".to_owned()],
            ..UserUpdate::default()
        };
        let patch = UserPatch::from_mask(&update).unwrap();
        assert_eq!(
            field_of(validator().validate_patch(&patch).unwrap_err()),
            "nickname"
        );
    }
}
