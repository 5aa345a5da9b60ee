//! Error types for account operations

use thiserror::Error;

use crate::store::StoreError;

/// Message used when a NotFound carries no message of its own
pub const NO_USER_MESSAGE: &str = "This user does not exist";

/// Which business rule rejected the caller's input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    /// Login without a username or a password
    EmptyCredentials,
    /// Registration without a password
    EmptyPassword,
    /// The username belongs to another user
    UsernameTaken,
    /// The supplied current password does not match
    WrongPassword,
}

impl ValidationKind {
    pub fn message(self) -> &'static str {
        match self {
            ValidationKind::EmptyCredentials => "Enter username and password",
            ValidationKind::EmptyPassword => "Enter a password",
            ValidationKind::UsernameTaken => "Username is already taken",
            ValidationKind::WrongPassword => "The password you have entered is empty or wrong",
        }
    }
}

/// Failure of an account operation
#[derive(Error, Debug)]
pub enum AccountError {
    /// The user (by id or by credentials) does not exist
    #[error("{}", .0.as_deref().unwrap_or(NO_USER_MESSAGE))]
    NotFound(Option<String>),

    /// Caller input broke a business rule
    #[error("{}", .0.message())]
    Validation(ValidationKind),

    /// The store failed for reasons unrelated to the request
    #[error("Store error: {0}")]
    Store(#[source] StoreError),

    /// The password hash primitive failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl AccountError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AccountError::NotFound(Some(message.into()))
    }

    /// True for the duplicate-username conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, AccountError::Validation(ValidationKind::UsernameTaken))
    }
}

impl From<ValidationKind> for AccountError {
    fn from(kind: ValidationKind) -> Self {
        AccountError::Validation(kind)
    }
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken(_) => AccountError::Validation(ValidationKind::UsernameTaken),
            StoreError::NotFound(_) => AccountError::NotFound(None),
            other => AccountError::Store(other),
        }
    }
}

/// Type alias for account results
pub type AccountResult<T> = Result<T, AccountError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AccountError::NotFound(None).to_string(),
            "This user does not exist"
        );
        assert_eq!(
            AccountError::not_found("That user does not exist").to_string(),
            "That user does not exist"
        );
        assert_eq!(
            AccountError::from(ValidationKind::UsernameTaken).to_string(),
            "Username is already taken"
        );
        assert_eq!(
            AccountError::from(ValidationKind::EmptyCredentials).to_string(),
            "Enter username and password"
        );
    }

    #[test]
    fn test_store_conflicts_become_validation_errors() {
        let err = AccountError::from(StoreError::UsernameTaken("alice".to_string()));
        assert!(err.is_conflict());

        let err = AccountError::from(StoreError::NotFound(Uuid::new_v4()));
        assert!(matches!(err, AccountError::NotFound(None)));

        let err = AccountError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AccountError::Store(_)));
        assert!(!err.is_conflict());
    }
}
