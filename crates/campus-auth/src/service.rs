//! Authentication service — registration, login, and refresh-token
//! rotation.

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::actor::Role;
use campus_core::models::session::CreateAuthSession;
use campus_core::models::user::{CreateUser, User};
use campus_core::repository::{AuthSessionRepository, UserRepository};
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for registration.
#[derive(Debug)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `Student` or `Instructor`. Admin accounts are provisioned out
    /// of band.
    pub role: Role,
}

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Raw opaque refresh token (return to client, not stored).
    pub refresh_token: String,
    /// Session ID (can be used for logout).
    pub session_id: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
    pub user: User,
}

/// Successful refresh result (new token pair).
#[derive(Debug)]
pub struct RefreshOutput {
    /// New signed JWT access token.
    pub access_token: String,
    /// New opaque refresh token (replaces the consumed one).
    pub refresh_token: String,
    /// New session ID.
    pub session_id: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: AuthSessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: AuthSessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Create a new account. The user repository hashes the password
    /// and its unique email index rejects duplicate accounts.
    pub async fn register(&self, input: RegisterInput) -> CampusResult<User> {
        if input.role == Role::Admin {
            return Err(CampusError::Validation {
                message: "admin accounts cannot be self-registered".into(),
            });
        }
        if input.password.len() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort.into());
        }

        self.user_repo
            .create(CreateUser {
                name: input.name,
                email: input.email,
                password: input.password,
                role: input.role,
            })
            .await
            .map_err(|e| match e {
                CampusError::AlreadyExists { .. } => AuthError::EmailTaken.into(),
                other => other,
            })
    }

    /// Authenticate a user with email + password and issue tokens.
    pub async fn login(&self, input: LoginInput) -> CampusResult<LoginOutput> {
        // 1. Look up the account. A missing account and a bad password
        //    are indistinguishable to the caller.
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .map_err(|_| AuthError::InvalidCredentials)?;

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )
        .map_err(|e| CampusError::Crypto(e.to_string()))?;

        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Generate refresh token and create session.
        let raw_refresh = token::generate_refresh_token();
        let token_hash = token::hash_refresh_token(&raw_refresh);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.refresh_token_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateAuthSession {
                user_id: user.id,
                token_hash,
                expires_at,
            })
            .await?;

        // 4. Issue JWT access token.
        let access_token = token::issue_access_token(user.id, user.role, &self.config)?;

        Ok(LoginOutput {
            access_token,
            refresh_token: raw_refresh,
            session_id: session.id,
            expires_in: self.config.access_token_lifetime_secs,
            user,
        })
    }

    /// Rotate a refresh token: consume the old one, and issue a new
    /// token pair.
    ///
    /// Each refresh token is single-use — the old session is
    /// invalidated before the new one is created.
    pub async fn refresh(&self, raw_refresh_token: &str) -> CampusResult<RefreshOutput> {
        // 1. Look up session by token hash.
        let token_hash = token::hash_refresh_token(raw_refresh_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                CampusError::NotFound { .. } => {
                    AuthError::TokenInvalid("refresh token not found or already used".into())
                        .into()
                }
                other => other,
            })?;

        // 2. Check session expiry.
        if session.expires_at <= Utc::now() {
            // Invalidate the expired session and reject.
            let _ = self.session_repo.invalidate(session.id).await;
            return Err(AuthError::TokenExpired.into());
        }

        // 3. Invalidate old session (single-use guarantee).
        self.session_repo.invalidate(session.id).await?;

        // 4. Re-read the account; its role may have changed since the
        //    last access token was minted.
        let user = self.user_repo.get_by_id(session.user_id).await?;

        // 5. Create new session with rotated refresh token.
        let raw_refresh = token::generate_refresh_token();
        let new_hash = token::hash_refresh_token(&raw_refresh);
        let expires_at =
            Utc::now() + Duration::seconds(self.config.refresh_token_lifetime_secs as i64);

        let new_session = self
            .session_repo
            .create(CreateAuthSession {
                user_id: user.id,
                token_hash: new_hash,
                expires_at,
            })
            .await?;

        // 6. Issue new access token.
        let access_token = token::issue_access_token(user.id, user.role, &self.config)?;

        Ok(RefreshOutput {
            access_token,
            refresh_token: raw_refresh,
            session_id: new_session.id,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Invalidate the session holding this refresh token (logout).
    pub async fn logout(&self, raw_refresh_token: &str) -> CampusResult<()> {
        let token_hash = token::hash_refresh_token(raw_refresh_token);
        match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(session) => self.session_repo.invalidate(session.id).await,
            // Logging out an unknown token is a no-op.
            Err(CampusError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Revoke all sessions for a user (e.g. on password change).
    pub async fn revoke_all_sessions(&self, user_id: Uuid) -> CampusResult<()> {
        self.session_repo.invalidate_user_sessions(user_id).await
    }
}
