use argon2::{
    Argon2,
    PasswordHash,
    PasswordVerifier,
    PasswordHasher,
};

use argon2::password_hash::{SaltString, rand_core::OsRng};
use std::sync::OnceLock;

/// Verify a secret against the Argon2 PHC string stored in usuarios.clave_hash.
/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(p) => p,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash a secret using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| format!("argon2 hash error: {e}"))
}

/// Burn the same Argon2 work as a real check when the user does not exist,
/// so response time does not reveal which usernames are registered.
/// Always returns false.
pub fn verify_missing_user(password: &str) -> bool {
    verify_password(password, dummy_hash());
    false
}

fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("citas-medicas-dummy").unwrap_or_default())
}
