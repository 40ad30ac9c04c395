//! Password hashing with argon2.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

const HASH_THREAD_STACK: usize = 4 * 1024 * 1024;

/// Hash a password into a PHC string.
///
/// Runs on a dedicated thread with a large stack; argon2 can overflow the
/// default stack in debug builds.
pub fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    std::thread::Builder::new()
        .stack_size(HASH_THREAD_STACK)
        .spawn(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))
        })?
        .join()
        .map_err(|_| anyhow::anyhow!("hash thread panicked"))?
}

/// Check a password against a stored PHC string.
///
/// Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    std::thread::Builder::new()
        .stack_size(HASH_THREAD_STACK)
        .spawn(move || {
            let Ok(parsed) = PasswordHash::new(&hash) else {
                return false;
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .map(|h| h.join().unwrap_or(false))
        .unwrap_or(false)
}
