//! Credential derivation for account passwords
//!
//! Passwords are hashed with Argon2id and stored in PHC string format. The
//! registry treats the result as an opaque [`Credential`]; nothing outside
//! this module looks inside it.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use serde::{Deserialize, Serialize};

use super::errors::ModelError;
use crate::Result;

/// Stored credential material for an account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Derive a stored credential from a plaintext password.
    pub fn from_password(password: impl AsRef<str>) -> Result<Self> {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);

        let password_hash = Argon2::default()
            .hash_password(password.as_ref().as_bytes(), &salt)
            .map_err(|e| ModelError::CredentialDerivation {
                reason: format!("Password hashing failed: {e}"),
            })?
            .to_string();

        Ok(Self(password_hash))
    }

    /// Verify a plaintext password against this credential.
    ///
    /// # Returns
    /// Ok(()) if the password matches, `ModelError::InvalidPassword` otherwise
    pub fn verify(&self, password: impl AsRef<str>) -> Result<()> {
        let parsed_hash = PasswordHash::new(&self.0).map_err(|_| ModelError::MalformedCredential)?;

        Argon2::default()
            .verify_password(password.as_ref().as_bytes(), &parsed_hash)
            .map_err(|_| ModelError::InvalidPassword.into())
    }

    /// The stored PHC string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
