//! User-account management service
//!
//! Registration, login, retrieval, update and deletion of user accounts.
//! [`service::AccountService`] holds the business rules; storage sits behind
//! [`store::UserStore`] and HTTP lives in [`routes`].

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod service;
pub mod store;

use crate::service::AccountService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
}

impl AppState {
    pub fn new(account_service: AccountService) -> Self {
        Self { account_service }
    }
}
