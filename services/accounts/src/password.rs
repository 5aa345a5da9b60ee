//! Deterministic password hashing
//!
//! Credentials are compared by hash equality, both in the service and inside
//! the store lookup, so the same plaintext must always produce the same
//! string. Argon2id is therefore run with one service-wide salt rather
//! than a random per-user salt.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher as _, SaltString},
};

use crate::error::{AccountError, AccountResult};

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory size in KiB
    pub m_cost: u32,
    /// Number of iterations
    pub t_cost: u32,
    /// Degree of parallelism
    pub p_cost: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            m_cost: Params::DEFAULT_M_COST,
            t_cost: Params::DEFAULT_T_COST,
            p_cost: Params::DEFAULT_P_COST,
        }
    }
}

/// One-way, deterministic password hasher
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    salt: SaltString,
}

impl PasswordHasher {
    /// Build a hasher from a B64-encoded salt (at least 8 decoded bytes)
    pub fn new(salt: &str, cost: HashCost) -> AccountResult<Self> {
        let params = Params::new(cost.m_cost, cost.t_cost, cost.p_cost, None)
            .map_err(|e| AccountError::Hashing(format!("invalid argon2 parameters: {}", e)))?;
        let salt = SaltString::from_b64(salt)
            .map_err(|e| AccountError::Hashing(format!("invalid salt: {}", e)))?;

        let hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            salt,
        };

        // Argon2 enforces its own salt length; surface that at construction.
        hasher.hash("")?;

        Ok(hasher)
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash(&self, password: &str) -> AccountResult<String> {
        self.argon2
            .hash_password(password.as_bytes(), &self.salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AccountError::Hashing(e.to_string()))
    }

    /// Whether `password` hashes to `password_hash`
    pub fn matches(&self, password: &str, password_hash: &str) -> AccountResult<bool> {
        Ok(self.hash(password)? == password_hash)
    }

    /// [`hash`](Self::hash) on the blocking thread pool, off the async workers
    pub async fn spawn_hash(&self, password: &str) -> AccountResult<String> {
        let hasher = self.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Hashing(format!("hashing task failed: {}", e)))?
    }

    /// [`matches`](Self::matches) on the blocking thread pool
    pub async fn spawn_matches(&self, password: &str, password_hash: &str) -> AccountResult<bool> {
        Ok(self.spawn_hash(password).await? == password_hash)
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TEST_SALT: &str = "dGVzdC1hY2NvdW50cy1zYWx0";

    /// Cheapest parameters Argon2 accepts, for fast tests
    pub(crate) fn test_hasher() -> PasswordHasher {
        PasswordHasher::new(
            TEST_SALT,
            HashCost {
                m_cost: 8,
                t_cost: 1,
                p_cost: 1,
            },
        )
        .expect("test hasher")
    }

    #[test]
    fn test_hash_is_deterministic() {
        let hasher = test_hasher();
        assert_eq!(hasher.hash("pw1").unwrap(), hasher.hash("pw1").unwrap());
    }

    #[test]
    fn test_hash_differs_per_password() {
        let hasher = test_hasher();
        assert_ne!(hasher.hash("pw1").unwrap(), hasher.hash("pw2").unwrap());
        assert_ne!(hasher.hash("").unwrap(), hasher.hash("pw1").unwrap());
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hasher = test_hasher();
        let hash = hasher.hash("correct horse battery staple").unwrap();
        assert!(!hash.contains("correct horse battery staple"));
    }

    #[test]
    fn test_matches() {
        let hasher = test_hasher();
        let hash = hasher.hash("pw1").unwrap();
        assert!(hasher.matches("pw1", &hash).unwrap());
        assert!(!hasher.matches("pw2", &hash).unwrap());
        assert!(!hasher.matches("", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_spawned_hash_matches_inline_hash() {
        let hasher = test_hasher();
        let inline = hasher.hash("pw1").unwrap();

        assert_eq!(hasher.spawn_hash("pw1").await.unwrap(), inline);
        assert!(hasher.spawn_matches("pw1", &inline).await.unwrap());
        assert!(!hasher.spawn_matches("pw2", &inline).await.unwrap());
    }

    #[test]
    fn test_salt_changes_hash() {
        let cost = HashCost {
            m_cost: 8,
            t_cost: 1,
            p_cost: 1,
        };
        let other = PasswordHasher::new("YW5vdGhlci1zZXJ2aWNlLXNhbHQ", cost).unwrap();
        assert_ne!(test_hasher().hash("pw1").unwrap(), other.hash("pw1").unwrap());
    }

    #[test]
    fn test_rejects_bad_salt() {
        assert!(PasswordHasher::new("c2hvcnQ", HashCost::default()).is_err());
        assert!(PasswordHasher::new("not base64 !!", HashCost::default()).is_err());
    }

    #[test]
    fn test_rejects_bad_cost() {
        let cost = HashCost {
            m_cost: 1,
            t_cost: 0,
            p_cost: 1,
        };
        assert!(PasswordHasher::new(TEST_SALT, cost).is_err());
    }
}
