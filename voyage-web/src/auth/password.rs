//! Salted one-way password hashing (Argon2id)

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version,
};
use voyage_core::{VoyageError, VoyageResult};

/// Argon2 cost parameters
///
/// Higher values make each hash slower to compute, for us and for anyone
/// brute-forcing a leaked hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordCost {
    /// Cheapest parameters argon2 accepts. Only suitable for tests.
    pub const MINIMUM: Self = Self {
        memory_kib: Params::MIN_M_COST,
        iterations: Params::MIN_T_COST,
        parallelism: Params::MIN_P_COST,
    };
}

/// Hashes and verifies passwords
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Hash at the configured cost that no password is expected to match
    decoy_hash: String,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish()
    }
}

impl PasswordHasher {
    pub fn new(cost: PasswordCost) -> VoyageResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| VoyageError::config(format!("invalid argon2 parameters: {e}")))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let decoy_hash = argon2
            .hash_password(b"voyage-decoy", &SaltString::generate(&mut OsRng))
            .map(|hash| hash.to_string())
            .map_err(|e| VoyageError::internal(format!("password hashing failed: {e}"), "password"))?;

        Ok(Self { argon2, decoy_hash })
    }

    /// Hash a password with a fresh random salt, returning a PHC string
    pub fn hash(&self, password: &str) -> VoyageResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| VoyageError::internal(format!("password hashing failed: {e}"), "password"))
    }

    /// Verify a password against a stored PHC string.
    ///
    /// A stored value that does not parse is treated as a mismatch.
    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match PasswordHash::new(stored_hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Spend the same work as a real verification when there is no stored
    /// hash to check, so an unknown account answers no faster than a wrong
    /// password. Always false.
    pub fn verify_missing(&self, password: &str) -> bool {
        self.verify(password, &self.decoy_hash);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(PasswordCost::MINIMUM).unwrap()
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hasher = hasher();
        let hash = hasher.hash("pw1").unwrap();

        assert_ne!(hash, "pw1");
        assert!(!hash.contains("pw1"));
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw1", &hash));
        assert!(!hasher.verify("pw2", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("same-password").unwrap();
        let second = hasher.hash("same-password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same-password", &first));
        assert!(hasher.verify("same-password", &second));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        assert!(!hasher().verify("pw1", "not-a-phc-string"));
    }

    #[test]
    fn test_verify_uses_cost_from_stored_hash() {
        let cheap = hasher();
        let hash = cheap.hash("pw1").unwrap();

        let default_cost = PasswordHasher::new(PasswordCost::default()).unwrap();
        assert!(default_cost.verify("pw1", &hash));
    }

    #[test]
    fn test_decoy_hash_uses_configured_cost() {
        let hasher = hasher();
        let decoy = PasswordHash::new(&hasher.decoy_hash).unwrap();
        let params = Params::try_from(&decoy).unwrap();

        assert_eq!(params.m_cost(), Params::MIN_M_COST);
        assert_eq!(params.t_cost(), Params::MIN_T_COST);
        assert!(!hasher.verify_missing("voyage-decoy"));
        assert!(!hasher.verify_missing(""));
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let cost = PasswordCost {
            memory_kib: 1,
            ..PasswordCost::MINIMUM
        };
        let error = PasswordHasher::new(cost).unwrap_err();
        assert_eq!(error.kind(), voyage_core::ErrorKind::Config);
    }
}
