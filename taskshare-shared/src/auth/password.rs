/// Password hashing using Argon2id
///
/// Passwords are hashed with Argon2id and a random per-password salt. Two
/// preconditions are enforced before hashing:
///
/// - at least 8 characters
/// - at most 72 bytes UTF-8 encoded (the input limit of the hashing
///   primitive the stored credentials were originally produced with)
///
/// Verification never surfaces an error to the caller: an oversized password
/// or an unparseable stored hash both report as a plain mismatch, so the
/// response gives no hint whether the failure was "too long", "corrupt hash",
/// or "wrong password".
///
/// # Example
///
/// ```
/// use taskshare_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password")?;
/// assert!(verify_password("super_secret_password", &hash));
/// assert!(!verify_password("wrong_password", &hash));
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Maximum password length in UTF-8 bytes accepted for hashing/verification
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Minimum password length in characters
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Password shorter than the 8-character minimum
    #[error("Password must be at least 8 characters long")]
    TooShort,

    /// Password longer than 72 bytes UTF-8 encoded
    #[error("Password is too long")]
    TooLong,

    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),
}

/// Hashes a password with Argon2id
///
/// # Errors
///
/// - [`PasswordError::TooShort`] if the password has fewer than 8 characters
/// - [`PasswordError::TooLong`] if the password exceeds 72 bytes
/// - [`PasswordError::HashError`] if hashing itself fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PasswordError::TooShort);
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(PasswordError::TooLong);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Returns `false` for any failure: oversized password, unparseable hash,
/// or a plain mismatch. The distinction is deliberately not observable.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if password.len() > MAX_PASSWORD_BYTES {
        return false;
    }

    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
