//! Salted password hashing (bcrypt).
//!
//! Both operations are CPU-bound; async callers run them on the blocking pool
//! (see [`AuthService`](super::service::AuthService)).

use crate::config::PasswordConfig;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    #[must_use]
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    #[must_use]
    pub fn from_config(cfg: &PasswordConfig) -> Self {
        Self::new(cfg.bcrypt_cost)
    }

    /// Hash with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns the bcrypt error if the cost is out of range.
    pub fn hash(&self, plaintext: &str) -> Result<String, bcrypt::BcryptError> {
        bcrypt::hash(plaintext, self.cost)
    }

    /// False on mismatch and on any stored hash bcrypt cannot parse.
    #[must_use]
    pub fn matches(&self, plaintext: &str, stored_hash: &str) -> bool {
        bcrypt::verify(plaintext, stored_hash).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Stored password hash could not be verified");
            false
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn hash_verifies_its_own_plaintext_only() {
        let h = hasher();
        let hash = h.hash("123456").unwrap();

        assert!(h.matches("123456", &hash));
        assert!(!h.matches("654321", &hash));
        assert_ne!(hash, "123456");
    }

    #[test]
    fn same_input_hashes_differently() {
        let h = hasher();
        let first = h.hash("abcdef").unwrap();
        let second = h.hash("abcdef").unwrap();

        assert_ne!(first, second);
        assert!(h.matches("abcdef", &first));
        assert!(h.matches("abcdef", &second));
    }

    #[test]
    fn malformed_hash_never_matches() {
        let h = hasher();
        for stored in ["", "123456", "$2b$", "$2b$04$tooshort"] {
            assert!(!h.matches("123456", stored));
        }
    }

    #[test]
    fn cost_comes_from_config() {
        let h = PasswordHasher::from_config(&PasswordConfig { bcrypt_cost: 5 });
        let hash = h.hash("abcdef").unwrap();
        assert!(hash.starts_with("$2b$05$"));
    }
}
