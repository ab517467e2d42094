//! Password hashing with Argon2id
//!
//! Hashes are stored in PHC string format, so verification always uses the
//! parameters a hash was created with even after the configured work factor
//! changes.

use std::sync::Arc;

use anyhow::Result;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{PasswordHasher as _, PasswordVerifier as _, SaltString},
};

/// Argon2 work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordConfig {
    /// Create a new PasswordConfig from environment variables
    ///
    /// # Environment Variables
    /// - `PASSWORD_HASH_MEMORY_KIB`: Memory cost (default: 19456)
    /// - `PASSWORD_HASH_ITERATIONS`: Time cost (default: 2)
    /// - `PASSWORD_HASH_PARALLELISM`: Lanes (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |name: &str, default: u32| {
            std::env::var(name)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        Self {
            memory_kib: read("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib),
            iterations: read("PASSWORD_HASH_ITERATIONS", defaults.iterations),
            parallelism: read("PASSWORD_HASH_PARALLELISM", defaults.parallelism),
        }
    }
}

/// Hashes and verifies passwords off the async executor
#[derive(Clone)]
pub struct PasswordService {
    params: Params,
    /// Verified against when the account does not exist, so unknown emails
    /// cost the same as wrong passwords
    dummy_hash: Arc<str>,
}

impl PasswordService {
    /// Initialize a new password service
    pub fn new(config: PasswordConfig) -> Result<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| anyhow::anyhow!("Invalid password hash parameters: {}", e))?;

        let mut service = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        service.dummy_hash = Arc::from(service.hash_blocking("not-a-real-password")?);
        Ok(service)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn hash_blocking(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();
        Ok(hash)
    }

    fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password
    pub async fn hash(&self, password: &str) -> Result<String> {
        let service = self.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || service.hash_blocking(&password)).await?
    }

    /// Verify a password against a stored hash
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let service = self.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || service.verify_blocking(&password, &hash)).await?
    }

    /// Burn one verification for an account that does not exist
    pub async fn verify_dummy(&self, password: &str) {
        let hash = self.dummy_hash.to_string();
        let _ = self.verify(password, &hash).await;
    }
}
