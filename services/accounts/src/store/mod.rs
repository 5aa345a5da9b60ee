//! Persistence boundary for user records
//!
//! The account service only talks to storage through [`UserStore`]. Stores
//! receive password hashes, never plaintext, and are expected to enforce
//! username uniqueness themselves so concurrent registrations cannot both
//! succeed.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Errors raised by a [`UserStore`]
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store's uniqueness constraint rejected the username
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    /// The targeted record does not exist
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Infrastructure failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Type alias for store results
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable owner of [`User`] records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Every user, in store-defined order
    async fn get_all_users(&self) -> StoreResult<Vec<User>>;

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Exact match on both the username and the stored hash
    async fn get_user_by_username_and_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> StoreResult<Option<User>>;

    /// Insert a user; the store assigns the id and timestamps
    async fn create_user(&self, new_user: &NewUser) -> StoreResult<User>;

    /// Overwrite username, names and hash of an existing user
    async fn update_user(&self, user: &User) -> StoreResult<User>;

    /// Remove a user, returning whether a record was deleted
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;
}
