//! Stateless email/password check.
//!
//! # Invariants
//! - Empty email or password never reaches the store.
//! - Success requires exactly one stored row to match; no token or session
//!   is issued.

use crate::credentials::PasswordScheme;
use crate::model::user::{StoredCredential, UserId};
use crate::model::{require_non_empty, ValidationError};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Marker returned by a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated {
    pub user_id: UserId,
}

#[derive(Debug)]
pub enum AuthError {
    Validation(ValidationError),
    InvalidCredentials,
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidCredentials => write!(f, "user and/or password is incorrect"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::InvalidCredentials => None,
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub struct AuthService<R: UserRepository> {
    repo: R,
    scheme: PasswordScheme,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: R, scheme: PasswordScheme) -> Self {
        Self { repo, scheme }
    }

    /// Checks an email/password pair against stored users.
    ///
    /// # Errors
    /// - `AuthError::Validation` when either field is empty (no query issued).
    /// - `AuthError::InvalidCredentials` unless exactly one row matches.
    /// - `AuthError::Repo` on store failure.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Authenticated, AuthError> {
        let candidates = self.lookup_candidates(email, password)?;
        select_credential(self.scheme, password, &candidates)
    }

    /// Validates both fields, then loads every stored credential for `email`.
    ///
    /// Only this step touches the store; [`select_credential`] finishes the check.
    pub fn lookup_candidates(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<StoredCredential>, AuthError> {
        require_non_empty("email", email)?;
        require_non_empty("password", password)?;
        Ok(self.repo.credentials_for_email(email)?)
    }
}

/// Picks the single stored credential matching `password`.
///
/// Fails with `AuthError::InvalidCredentials` when none or several match.
pub fn select_credential(
    scheme: PasswordScheme,
    password: &str,
    candidates: &[StoredCredential],
) -> Result<Authenticated, AuthError> {
    let mut matching = candidates
        .iter()
        .filter(|credential| scheme.matches(password, &credential.password));

    match (matching.next(), matching.next()) {
        (Some(credential), None) => {
            info!(
                "event=authenticate module=service status=ok user_id={}",
                credential.user_id
            );
            Ok(Authenticated {
                user_id: credential.user_id,
            })
        }
        (first, _) => {
            warn!(
                "event=authenticate module=service status=error error_code={}",
                if first.is_some() {
                    "ambiguous_credentials"
                } else {
                    "invalid_credentials"
                }
            );
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{select_credential, AuthError, AuthService};
    use crate::credentials::PasswordScheme;
    use crate::model::user::{NewUser, StoredCredential, User, UserChanges, UserId};
    use crate::model::ValidationError;
    use crate::repo::user_repo::UserRepository;
    use crate::repo::{RepoError, RepoResult};
    use std::cell::Cell;

    /// Fake store that only answers credential lookups and counts them.
    struct CountingRepo {
        rows: Vec<StoredCredential>,
        lookups: Cell<usize>,
    }

    impl CountingRepo {
        fn with(rows: &[(UserId, &str)]) -> Self {
            Self {
                rows: rows
                    .iter()
                    .map(|(user_id, password)| StoredCredential {
                        user_id: *user_id,
                        password: (*password).to_string(),
                    })
                    .collect(),
                lookups: Cell::new(0),
            }
        }
    }

    impl UserRepository for CountingRepo {
        fn list_users(&self) -> RepoResult<Vec<User>> {
            unreachable!("not used by authentication")
        }
        fn get_user(&self, _id: UserId) -> RepoResult<User> {
            unreachable!("not used by authentication")
        }
        fn create_user(&self, _user: &NewUser) -> RepoResult<User> {
            unreachable!("not used by authentication")
        }
        fn update_user(&self, _id: UserId, _changes: &UserChanges) -> RepoResult<User> {
            unreachable!("not used by authentication")
        }
        fn delete_user(&self, _id: UserId) -> RepoResult<UserId> {
            unreachable!("not used by authentication")
        }
        fn credentials_for_email(&self, _email: &str) -> RepoResult<Vec<StoredCredential>> {
            self.lookups.set(self.lookups.get() + 1);
            if self.rows.is_empty() {
                return Err(RepoError::InvalidData("store offline".to_string()));
            }
            Ok(self.rows.clone())
        }
    }

    #[test]
    fn empty_fields_never_reach_the_store() {
        let repo = CountingRepo::with(&[]);
        let service = AuthService::new(&repo, PasswordScheme::Plaintext);

        let err = service.authenticate("", "p").unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::EmptyField("email"))
        ));
        let err = service.authenticate("a@x.com", "").unwrap_err();
        assert!(matches!(
            err,
            AuthError::Validation(ValidationError::EmptyField("password"))
        ));
        assert_eq!(repo.lookups.get(), 0);
    }

    #[test]
    fn duplicate_matching_rows_are_rejected() {
        let repo = CountingRepo::with(&[(1, "p"), (2, "p")]);
        let service = AuthService::new(&repo, PasswordScheme::Plaintext);

        let err = service.authenticate("a@x.com", "p").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(repo.lookups.get(), 1);
    }

    #[test]
    fn single_match_among_same_email_rows_succeeds() {
        let repo = CountingRepo::with(&[(1, "old"), (2, "p")]);
        let service = AuthService::new(&repo, PasswordScheme::Plaintext);

        let ok = service.authenticate("a@x.com", "p").unwrap();
        assert_eq!(ok.user_id, 2);
    }

    #[test]
    fn store_failure_is_not_reported_as_bad_credentials() {
        let repo = CountingRepo::with(&[]);
        let service = AuthService::new(&repo, PasswordScheme::Plaintext);

        let err = service.authenticate("a@x.com", "p").unwrap_err();
        assert!(matches!(err, AuthError::Repo(_)));
    }

    #[test]
    fn credential_selection_needs_no_store() {
        let stored = PasswordScheme::Argon2.encode("p").unwrap();
        let candidates = [
            StoredCredential {
                user_id: 1,
                password: PasswordScheme::Argon2.encode("other").unwrap(),
            },
            StoredCredential {
                user_id: 4,
                password: stored,
            },
        ];

        let ok = select_credential(PasswordScheme::Argon2, "p", &candidates).unwrap();
        assert_eq!(ok.user_id, 4);
        let err = select_credential(PasswordScheme::Argon2, "q", &candidates).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }
}
