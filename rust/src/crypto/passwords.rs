//! Password hashing helpers built around bcrypt.
//! Hashes are emitted in the `$2b$` modular-crypt format, which carries the
//! cost and salt alongside the digest so nothing else needs to be stored.
//!
//! bcrypt only consumes the first 72 bytes of the password; longer inputs are
//! accepted and silently truncated by the primitive.

use bcrypt::{BcryptError, HashParts, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Cost used when the caller does not pick one.
pub const DEFAULT_COST: u32 = 10;
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum HashingError {
    #[error("cost {0} is outside the accepted range 4..=31")]
    InvalidCost(u32),
    #[error("salt generation failed: {0}")]
    Salt(#[source] rand::Error),
    #[error("bcrypt failed: {0}")]
    Bcrypt(#[from] BcryptError),
}

fn generate_salt() -> Result<[u8; SALT_LEN], HashingError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt).map_err(HashingError::Salt)?;
    Ok(salt)
}

/// Hashes a password with a fresh random salt and returns the `$2b$` string.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String, HashingError> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(HashingError::InvalidCost(cost));
    }

    let salt = generate_salt()?;
    let parts = bcrypt::hash_with_salt(plaintext.as_bytes(), cost, salt)?;
    tracing::debug!(cost, "password hashed");
    Ok(parts.format_for_version(Version::TwoB))
}

pub fn hash_password_default(plaintext: &str) -> Result<String, HashingError> {
    hash_password(plaintext, DEFAULT_COST)
}

/// Verifies a plaintext password against a stored bcrypt hash.
/// A malformed hash is treated as a mismatch.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(plaintext.as_bytes(), stored_hash) {
        Ok(matches) => matches,
        Err(err) => {
            tracing::debug!(error = %err, "stored hash could not be parsed");
            false
        }
    }
}

/// Reads the cost embedded in a stored hash.
pub fn hash_cost(stored_hash: &str) -> Result<u32, HashingError> {
    let parts: HashParts = stored_hash.parse()?;
    Ok(parts.get_cost())
}

#[cfg(test)]
mod tests {
    use super::{
        hash_cost, hash_password, hash_password_default, verify_password, HashingError, DEFAULT_COST,
        MAX_COST, MIN_COST,
    };

    #[test]
    fn hashes_and_verifies_passwords() {
        let hash = hash_password("squire-test-password", MIN_COST).expect("hashing should succeed");
        assert!(verify_password("squire-test-password", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn embeds_requested_cost() {
        for cost in [4, 5, 7] {
            let hash = hash_password("pa55word", cost).expect("hashing should succeed");
            assert_eq!(hash_cost(&hash).unwrap(), cost);
            assert!(hash.starts_with(&format!("$2b${cost:02}$")));
            assert_eq!(hash.len(), 60);
        }
    }

    #[test]
    fn default_cost_is_ten() {
        let hash = hash_password_default("squire-test-password").unwrap();
        assert_eq!(hash_cost(&hash).unwrap(), DEFAULT_COST);
        assert!(hash.starts_with("$2b$10$"));
    }

    #[test]
    fn salts_every_call() {
        let first = hash_password("same input", MIN_COST).unwrap();
        let second = hash_password("same input", MIN_COST).unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same input", &first));
        assert!(verify_password("same input", &second));
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let low = hash_password("pw", MIN_COST - 1).unwrap_err();
        assert!(matches!(low, HashingError::InvalidCost(3)));

        let high = hash_password("pw", MAX_COST + 1).unwrap_err();
        assert!(matches!(high, HashingError::InvalidCost(32)));
        assert!(format!("{high}").contains("outside the accepted range"));
    }

    #[test]
    fn hashes_empty_and_unicode_passwords() {
        let empty = hash_password("", MIN_COST).unwrap();
        assert!(verify_password("", &empty));
        assert!(!verify_password(" ", &empty));

        let unicode = hash_password("mot de passe é ü 密码", MIN_COST).unwrap();
        assert!(verify_password("mot de passe é ü 密码", &unicode));
    }

    #[test]
    fn malformed_hash_does_not_verify() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(matches!(hash_cost("not-a-bcrypt-hash"), Err(HashingError::Bcrypt(_))));
    }

    #[test]
    fn hash_never_contains_equals_sign() {
        let hash = hash_password("a=b=c", MIN_COST).unwrap();
        assert!(!hash.contains('='));
    }
}
