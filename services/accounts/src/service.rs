//! Account business rules
//!
//! Every operation is a single request against the injected [`UserStore`];
//! the service keeps no state between calls and does no locking. Username
//! uniqueness is checked here first and backstopped by the store, whose
//! conflicts surface as the same validation error.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AccountError, AccountResult, NO_USER_MESSAGE, ValidationKind},
    models::{LoginRequest, NewUser, RegisterRequest, UpdateRequest, User},
    password::PasswordHasher,
    store::UserStore,
};

/// Registration, authentication and maintenance of user accounts
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl AccountService {
    /// Create a new account service over `store`
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    /// Every known user, in store order
    pub async fn get_all(&self) -> AccountResult<Vec<User>> {
        Ok(self.store.get_all_users().await?)
    }

    /// Fetch one user
    pub async fn get_by_id(&self, id: Uuid) -> AccountResult<User> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| AccountError::not_found(NO_USER_MESSAGE))
    }

    /// Authenticate by username and password.
    ///
    /// An unknown username and a wrong password fail identically.
    pub async fn login(&self, request: &LoginRequest) -> AccountResult<User> {
        if request.username.is_empty() || request.password.is_empty() {
            return Err(ValidationKind::EmptyCredentials.into());
        }

        info!("Login attempt for user: {}", request.username);

        let password_hash = self.hasher.spawn_hash(&request.password).await?;
        let user = self
            .store
            .get_user_by_username_and_password(&request.username, &password_hash)
            .await?;

        match user {
            Some(user) => Ok(user),
            None => {
                warn!("Login rejected for user: {}", request.username);
                Err(AccountError::not_found(
                    "User with this username and password does not exist",
                ))
            }
        }
    }

    /// Create a new user
    pub async fn register(&self, request: &RegisterRequest) -> AccountResult<User> {
        if request.password.is_empty() {
            return Err(ValidationKind::EmptyPassword.into());
        }

        info!("Registering user: {}", request.username);

        if self.username_exists(&request.username).await? {
            warn!("Username already taken: {}", request.username);
            return Err(ValidationKind::UsernameTaken.into());
        }

        let new_user = NewUser {
            username: request.username.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            password_hash: self.hasher.spawn_hash(&request.password).await?,
        };

        let user = self.store.create_user(&new_user).await?;
        info!("Registered user {} ({})", user.username, user.id);

        Ok(user)
    }

    /// Overwrite a user's username, names and password.
    ///
    /// The stored hash is always recomputed from `new_password`, even when it
    /// is empty or equal to the old password.
    pub async fn update(&self, id: Uuid, request: &UpdateRequest) -> AccountResult<User> {
        info!("Updating user: {}", id);

        let mut user = self.get_by_id(id).await?;

        if !self
            .hasher
            .spawn_matches(&request.old_password, &user.password_hash)
            .await?
        {
            warn!("Wrong password supplied for user: {}", id);
            return Err(ValidationKind::WrongPassword.into());
        }

        if user.username != request.username && self.username_exists(&request.username).await? {
            warn!("Username already taken: {}", request.username);
            return Err(ValidationKind::UsernameTaken.into());
        }

        user.username = request.username.clone();
        user.first_name = request.first_name.clone();
        user.last_name = request.last_name.clone();
        user.password_hash = self.hasher.spawn_hash(&request.new_password).await?;

        Ok(self.store.update_user(&user).await?)
    }

    /// Remove a user
    pub async fn delete(&self, id: Uuid) -> AccountResult<()> {
        info!("Deleting user: {}", id);

        self.store
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| AccountError::not_found("That user does not exist"))?;

        // A concurrent delete between the lookup and here is still NotFound.
        if !self.store.delete_user(id).await? {
            return Err(AccountError::not_found("That user does not exist"));
        }

        Ok(())
    }

    async fn username_exists(&self, username: &str) -> AccountResult<bool> {
        let users = self.store.get_all_users().await?;
        Ok(users.iter().any(|u| u.username == username))
    }
}
