//! User account model.
//!
//! # Invariants
//! - `email` and `password` are non-empty for every write.
//! - `password` holds whatever the active `PasswordScheme` stored (raw or encoded).

use super::{require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};

pub type UserId = i64;

/// Stored user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub confirmed_email: bool,
}

/// Registration input. Only credentials are collected at sign-up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("email", &self.email)?;
        require_non_empty("password", &self.password)
    }
}

/// Full replacement of a user's mutable fields.
///
/// Partial updates are not supported: omitted fields reset to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserChanges {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub confirmed_email: bool,
}

impl UserChanges {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("email", &self.email)?;
        require_non_empty("password", &self.password)
    }
}

/// Public projection returned by registration and single-user lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub password: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password: user.password,
        }
    }
}

/// Stored credential pair used by the authentication check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub user_id: UserId,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::{NewUser, UserChanges};
    use crate::model::ValidationError;

    #[test]
    fn new_user_requires_email_then_password() {
        assert_eq!(
            NewUser::new("", "").validate(),
            Err(ValidationError::EmptyField("email"))
        );
        assert_eq!(
            NewUser::new("a@x.com", "").validate(),
            Err(ValidationError::EmptyField("password"))
        );
        assert!(NewUser::new("a@x.com", "p").validate().is_ok());
    }

    #[test]
    fn changes_ignore_empty_optional_fields() {
        let changes = UserChanges {
            email: "a@x.com".to_string(),
            password: "p".to_string(),
            ..UserChanges::default()
        };
        assert!(changes.validate().is_ok());
    }
}
