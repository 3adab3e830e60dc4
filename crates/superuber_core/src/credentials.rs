//! Password storage schemes.
//!
//! # Responsibility
//! - Encode passwords before they are written to `users.password`.
//! - Compare a supplied password against a stored value.
//!
//! # Invariants
//! - `Plaintext` stores and compares raw bytes, case-sensitive.
//! - `Argon2` stores a PHC string with a random salt per encode.
//! - Encoding an empty password yields an empty value so write validation
//!   still rejects it.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How user passwords are stored and verified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Raw password stored as-is.
    #[default]
    Plaintext,
    /// Argon2id hash in PHC string format.
    Argon2,
}

/// Failure to encode a password for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialError(String);

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password encoding failed: {}", self.0)
    }
}

impl Error for CredentialError {}

impl PasswordScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plaintext => "plaintext",
            Self::Argon2 => "argon2",
        }
    }

    /// Produces the value stored in `users.password`.
    pub fn encode(self, raw: &str) -> Result<String, CredentialError> {
        if raw.is_empty() {
            return Ok(String::new());
        }
        match self {
            Self::Plaintext => Ok(raw.to_string()),
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(raw.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|err| CredentialError(err.to_string()))
            }
        }
    }

    /// Returns whether `raw` matches the stored value.
    ///
    /// A stored value that is not a valid PHC string never matches under `Argon2`.
    pub fn matches(self, raw: &str, stored: &str) -> bool {
        match self {
            Self::Plaintext => raw == stored,
            Self::Argon2 => PasswordHash::new(stored)
                .map(|hash| {
                    Argon2::default()
                        .verify_password(raw.as_bytes(), &hash)
                        .is_ok()
                })
                .unwrap_or(false),
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => Err(format!(
                "unsupported password scheme `{other}`; expected plaintext|argon2"
            )),
        }
    }
}
