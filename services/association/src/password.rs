//! Argon2 password hashing.

use anyhow::anyhow;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AssociationError;

/// Hash a plaintext password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, AssociationError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AssociationError::Internal(anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash verifies as `false` rather than erroring; the
/// caller cannot distinguish it from a wrong password, which is the
/// behavior login wants.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
