//! Authentication error types.

use campus_core::error::CampusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("password does not meet the minimum length")]
    PasswordTooShort,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for CampusError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_) => CampusError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::EmailTaken => CampusError::AlreadyExists {
                entity: "user".into(),
            },
            AuthError::PasswordTooShort => CampusError::Validation {
                message: err.to_string(),
            },
            AuthError::Crypto(msg) => CampusError::Crypto(msg),
        }
    }
}
