use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;

/// Digest of a password no account uses. Logins naming an unknown email verify
/// against it so they cost the same Argon2 work as a wrong password.
static DECOY_DIGEST: Lazy<Option<String>> = Lazy::new(|| hash_password("readlist-decoy-password").ok());

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error("Stored password digest is corrupt: {0}")]
    CorruptDigest(String),
}

/// Hash a password into an Argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, digest: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|e| PasswordError::CorruptDigest(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Argon2 is CPU bound; keep it off the async workers.
pub async fn hash_password_blocking(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::Hash(e.to_string()))?
}

pub async fn verify_password_blocking(password: String, digest: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &digest))
        .await
        .map_err(|e| PasswordError::Hash(e.to_string()))?
}

/// Spend one verification's worth of work without any account to match.
/// Always `false`.
pub async fn verify_decoy_blocking(password: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || match DECOY_DIGEST.as_deref() {
        Some(digest) => verify_password(&password, digest).map(|_| false),
        None => Ok(false),
    })
    .await
    .map_err(|e| PasswordError::Hash(e.to_string()))?
}
