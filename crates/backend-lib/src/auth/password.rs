// ============================
// backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, SaltString},
    Argon2,
};
use rand::Rng;
use scrypt::Scrypt;
use zeroize::Zeroize;

/// Salt length in bytes for newly generated hashes
const SALT_BYTES: usize = 16;

/// Modular-crypt prefixes of bcrypt hashes (`bcryptjs` writes `$2a$`/`$2b$`)
const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// `$2b$NN$` followed by 22 salt and 31 digest characters
const BCRYPT_HASH_LEN: usize = 60;

fn is_bcrypt(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns a PHC string suitable for `auth.password_hash`.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rng().fill(&mut bytes);
    let salt = SaltString::encode_b64(&bytes)?;
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

/// Check that `hash` is a stored-password format `verify_password` handles.
pub fn check_hash_format(hash: &str) -> Result<(), String> {
    if is_bcrypt(hash) {
        let cost = hash
            .get(4..6)
            .and_then(|digits| digits.parse::<u32>().ok())
            .filter(|cost| (4..=31).contains(cost));
        return match cost {
            Some(_) if hash.len() == BCRYPT_HASH_LEN && hash.as_bytes()[6] == b'$' => Ok(()),
            _ => Err("malformed bcrypt hash".to_string()),
        };
    }
    PasswordHash::new(hash)
        .map(|_| ())
        .map_err(|e| format!("not a PHC string: {e}"))
}

/// Verify a password against a stored hash.
///
/// Argon2 and scrypt PHC strings are accepted, as are bcrypt hashes. A hash
/// that does not parse, or names another algorithm, verifies nothing.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    if is_bcrypt(hash) {
        return bcrypt::verify(plain, hash).unwrap_or(false);
    }
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    parsed_hash
        .verify_password(&[&Argon2::default(), &Scrypt], plain.as_bytes())
        .is_ok()
}

/// Securely hash a password and zeroize the original
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain);
    plain.zeroize();
    hash
}
