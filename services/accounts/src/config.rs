//! Service configuration

use anyhow::{Context, Result};
use std::{net::SocketAddr, str::FromStr};

use crate::password::HashCost;

/// Where user records live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("unknown storage backend: {}", other),
        }
    }
}

/// Accounts service configuration
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
    /// Storage backend
    pub storage: StorageBackend,
    /// B64-encoded service-wide password salt
    pub password_salt: String,
    /// Argon2 cost parameters
    pub hash_cost: HashCost,
}

impl AccountsConfig {
    /// Create a new AccountsConfig from environment variables
    ///
    /// # Environment Variables
    /// - `ACCOUNTS_LISTEN_ADDR`: Bind address (default: 0.0.0.0:3000)
    /// - `ACCOUNTS_STORAGE`: `postgres` or `memory` (default: postgres)
    /// - `ACCOUNTS_PASSWORD_SALT`: B64 salt, at least 8 decoded bytes (required)
    /// - `ACCOUNTS_ARGON2_M_COST`: Memory cost in KiB (default: 19456)
    /// - `ACCOUNTS_ARGON2_T_COST`: Iterations (default: 2)
    /// - `ACCOUNTS_ARGON2_P_COST`: Parallelism (default: 1)
    pub fn from_env() -> Result<Self> {
        let listen_addr = env_or("ACCOUNTS_LISTEN_ADDR", "0.0.0.0:3000")
            .parse::<SocketAddr>()
            .context("ACCOUNTS_LISTEN_ADDR is not a socket address")?;

        let storage = env_or("ACCOUNTS_STORAGE", "postgres").parse::<StorageBackend>()?;

        let password_salt = std::env::var("ACCOUNTS_PASSWORD_SALT")
            .map_err(|_| anyhow::anyhow!("ACCOUNTS_PASSWORD_SALT environment variable not set"))?;

        let defaults = HashCost::default();
        let hash_cost = HashCost {
            m_cost: parse_env("ACCOUNTS_ARGON2_M_COST", defaults.m_cost)?,
            t_cost: parse_env("ACCOUNTS_ARGON2_T_COST", defaults.t_cost)?,
            p_cost: parse_env("ACCOUNTS_ARGON2_P_COST", defaults.p_cost)?,
        };

        Ok(Self {
            listen_addr,
            storage,
            password_salt,
            hash_cost,
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be an unsigned integer, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
