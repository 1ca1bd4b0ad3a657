//! Admin bootstrap for initial setup.
//!
//! Creates the first administrator on startup when configured. Idempotent:
//! if the bootstrap email is already registered, nothing happens.

use domain::models::GlobalRole;
use persistence::repositories::AccountRepository;
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminBootstrapConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// Global roles the bootstrap administrator receives.
pub const BOOTSTRAP_ROLES: [GlobalRole; 3] =
    [GlobalRole::Admin, GlobalRole::Creator, GlobalRole::Member];

/// Whether the configuration asks for a bootstrap account at all.
pub fn is_requested(config: &AdminBootstrapConfig) -> bool {
    if config.bootstrap_email.is_empty() {
        return false;
    }
    if config.bootstrap_password.is_empty() {
        warn!(
            "ATT__ADMIN__BOOTSTRAP_EMAIL is set but ATT__ADMIN__BOOTSTRAP_PASSWORD is empty - skipping bootstrap"
        );
        return false;
    }
    true
}

/// Bootstrap the admin account if configured and not already present.
///
/// Call after migrations on startup. Returns the new account's id, or
/// `None` when nothing was created.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminBootstrapConfig,
) -> Result<Option<i64>, BootstrapError> {
    if !is_requested(config) {
        return Ok(None);
    }

    let accounts = AccountRepository::new(pool.clone());

    if accounts
        .find_by_email(&config.bootstrap_email)
        .await?
        .is_some()
    {
        info!("Bootstrap email already registered - skipping bootstrap");
        return Ok(None);
    }

    let password_hash = hash_password(&config.bootstrap_password)?;
    let roles: Vec<&str> = BOOTSTRAP_ROLES.iter().map(GlobalRole::as_str).collect();

    let account = accounts
        .create(
            &config.bootstrap_email,
            &config.bootstrap_name,
            None,
            &password_hash,
            &roles,
        )
        .await?;

    info!(
        email = %account.email,
        account_id = account.id,
        "Bootstrap admin account created"
    );
    warn!(
        "SECURITY: Remove ATT__ADMIN__BOOTSTRAP_EMAIL and ATT__ADMIN__BOOTSTRAP_PASSWORD \
         from configuration after initial setup"
    );

    Ok(Some(account.id))
}
