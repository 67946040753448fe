// src/core/auth/password.rs

//! Argon2 password hashing and verification.

use crate::core::StratoError;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Verifies a plaintext password against a stored Argon2 hash. An unparseable
/// stored hash counts as a failed verification, not an error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hashes a password for inclusion in the users file. Exposed through the
/// server binary's `--hash-password` flag for administrators.
pub fn hash_password(password: &str) -> Result<String, StratoError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StratoError::Internal(format!("password hashing failed: {e}")))
}
