//! User account use-cases.
//!
//! # Invariants
//! - Passwords are encoded with the configured scheme before they reach the
//!   repository; raw passwords are never logged.
//! - Repository ordering is preserved: `NotFound` is reported before validation
//!   errors on update.

use crate::credentials::{CredentialError, PasswordScheme};
use crate::model::user::{NewUser, User, UserChanges, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum UserServiceError {
    Repo(RepoError),
    Credential(CredentialError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Credential(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Credential(err) => Some(err),
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CredentialError> for UserServiceError {
    fn from(value: CredentialError) -> Self {
        Self::Credential(value)
    }
}

/// User CRUD facade over a repository implementation.
pub struct UserService<R: UserRepository> {
    repo: R,
    scheme: PasswordScheme,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R, scheme: PasswordScheme) -> Self {
        Self { repo, scheme }
    }

    pub fn list_users(&self) -> RepoResult<Vec<User>> {
        self.repo.list_users()
    }

    pub fn get_user(&self, id: UserId) -> RepoResult<User> {
        self.repo.get_user(id)
    }

    /// Registers a user from email and password.
    ///
    /// Empty fields fail validation and nothing is written.
    pub fn create_user(&self, user: &NewUser) -> Result<User, UserServiceError> {
        let encoded = encode_new_user(self.scheme, user)?;
        Ok(self.store_new_user(&encoded)?)
    }

    /// Writes a registration already prepared by [`encode_new_user`].
    pub fn store_new_user(&self, encoded: &NewUser) -> RepoResult<User> {
        let created = self.repo.create_user(encoded)?;
        info!(
            "event=user_create module=service status=ok user_id={} scheme={}",
            created.id,
            self.scheme.as_str()
        );
        Ok(created)
    }

    /// Replaces every mutable field of an existing user.
    pub fn update_user(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<User, UserServiceError> {
        let encoded = encode_user_changes(self.scheme, changes)?;
        Ok(self.store_user_changes(id, &encoded)?)
    }

    /// Writes changes already prepared by [`encode_user_changes`].
    pub fn store_user_changes(&self, id: UserId, encoded: &UserChanges) -> RepoResult<User> {
        let updated = self.repo.update_user(id, encoded)?;
        info!("event=user_update module=service status=ok user_id={id}");
        Ok(updated)
    }

    pub fn delete_user(&self, id: UserId) -> RepoResult<UserId> {
        let deleted = self.repo.delete_user(id)?;
        info!("event=user_delete module=service status=ok user_id={deleted}");
        Ok(deleted)
    }
}

/// Validates a registration, then encodes its password.
///
/// Needs no store, so hashing can run while other requests use the connection.
pub fn encode_new_user(
    scheme: PasswordScheme,
    user: &NewUser,
) -> Result<NewUser, UserServiceError> {
    user.validate().map_err(RepoError::from)?;
    Ok(NewUser {
        email: user.email.clone(),
        password: scheme.encode(&user.password)?,
    })
}

/// Encodes the password of a full-replacement update.
///
/// Field validation stays with the repository, after the existence check; an
/// empty password encodes to an empty value so that check still sees it.
pub fn encode_user_changes(
    scheme: PasswordScheme,
    changes: &UserChanges,
) -> Result<UserChanges, UserServiceError> {
    Ok(UserChanges {
        password: scheme.encode(&changes.password)?,
        ..changes.clone()
    })
}
