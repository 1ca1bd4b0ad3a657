//! Authentication service for account registration and login.

use domain::models::account::{AccountResponse, LoginResponse};
use domain::models::{Account, GlobalRole};
use domain::DomainError;
use persistence::repositories::AccountRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;

use crate::error::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Stored account is invalid: {0}")]
    InvalidAccount(#[from] DomainError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email already registered".to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::TokenError(e) => e.into(),
            AuthError::PasswordError(e) => e.into(),
            AuthError::DatabaseError(e) => e.into(),
            AuthError::InvalidAccount(e) => ApiError::Internal(e.to_string()),
        }
    }
}

/// Authentication service.
pub struct AuthService<'a> {
    accounts: AccountRepository,
    jwt: &'a JwtConfig,
}

impl<'a> AuthService<'a> {
    pub fn new(pool: PgPool, jwt: &'a JwtConfig) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
            jwt,
        }
    }

    /// Register a new account. Every new account is a plain member.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
        avatar: Option<&str>,
    ) -> Result<Account, AuthError> {
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let created = self
            .accounts
            .create(
                email,
                name.trim(),
                avatar,
                &password_hash,
                &[GlobalRole::Member.as_str()],
            )
            .await;

        // Lost a race with a concurrent registration of the same email
        if let Err(sqlx::Error::Database(db_err)) = &created {
            if db_err.code().as_deref() == Some("23505") {
                return Err(AuthError::EmailAlreadyExists);
            }
        }

        let account = Account::try_from(created?)?;
        tracing::info!(account_id = account.id, "Account registered");
        Ok(account)
    }

    /// Login with email and password, issuing an access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let entity = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &entity.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let account = Account::try_from(entity)?;
        let (access_token, _jti) = self
            .jwt
            .generate_access_token(account.id, &account.role_names())?;

        tracing::info!(account_id = account.id, "Account logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry_secs,
            account: AccountResponse::from(account),
        })
    }
}
