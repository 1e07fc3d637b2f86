use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use common::error::{PortalError, PortalResult};
use once_cell::sync::Lazy;

/// Hash checked when a login names an unknown email so that a miss costs the same as a wrong
/// password
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("not-a-real-password").ok());

/// Hash a plain text `password` with Argon2id and a random salt. Returns the PHC string.
/// # Errors
/// This function will return an error if the hasher rejects the password or salt
pub fn hash_password(password: &str) -> PortalResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|error| PortalError::PasswordHash(error.to_string()))
}

/// Verify a plain text `password` against a stored PHC `hash`
/// # Errors
/// This function will return an error if the password does not match or the stored hash cannot be
/// parsed. A mismatch is always [PortalError::InvalidUser].
pub fn verify_password(password: &str, hash: &str) -> PortalResult<()> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|error| PortalError::PasswordHash(error.to_string()))?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PortalError::InvalidUser)
}

/// Burn the time of a password check for a login that matched no user. Returns the error to send
/// back, which is the same as for a wrong password.
pub fn reject_unknown_user(password: &str) -> PortalError {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    PortalError::InvalidUser
}
