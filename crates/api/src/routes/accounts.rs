//! Account routes: the requester's own profile and global role management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::account::AccountResponse;
use domain::models::{Account, GlobalRole};
use persistence::repositories::AccountRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Authenticated;

async fn load_account(repo: &AccountRepository, account_id: i64) -> Result<Account, ApiError> {
    let entity = repo
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Account not found".to_string()))?;
    Account::try_from(entity).map_err(|e| ApiError::Internal(e.to_string()))
}

/// The authenticated account with its current global roles.
///
/// GET /api/v1/accounts/me
pub async fn me(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<AccountResponse>, ApiError> {
    let repo = AccountRepository::new(state.pool.clone());
    let account = load_account(&repo, auth.account_id()).await?;
    Ok(Json(account.into()))
}

fn require_admin(auth: &Authenticated) -> Result<(), ApiError> {
    if auth.0.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only administrators may manage global roles".to_string(),
        ))
    }
}

/// Grant a global role. Admin only; granting a held role is a no-op.
///
/// PUT /api/v1/accounts/:account_id/global-roles/:role
pub async fn grant_global_role(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((account_id, role)): Path<(i64, String)>,
) -> Result<Json<AccountResponse>, ApiError> {
    require_admin(&auth)?;
    let role: GlobalRole = role.parse()?;

    let repo = AccountRepository::new(state.pool.clone());
    if !repo.grant_global_role(account_id, role.as_str()).await? {
        return Err(ApiError::NotFound("Account not found".to_string()));
    }

    tracing::info!(
        account_id,
        role = %role,
        granted_by = auth.account_id(),
        "Global role granted"
    );

    let account = load_account(&repo, account_id).await?;
    Ok(Json(account.into()))
}

/// Revoke a global role. Admin only; admins cannot revoke their own admin
/// role.
///
/// DELETE /api/v1/accounts/:account_id/global-roles/:role
pub async fn revoke_global_role(
    State(state): State<AppState>,
    auth: Authenticated,
    Path((account_id, role)): Path<(i64, String)>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    let role: GlobalRole = role.parse()?;

    if role == GlobalRole::Admin && account_id == auth.account_id() {
        return Err(ApiError::Conflict(
            "Administrators cannot revoke their own admin role".to_string(),
        ));
    }

    let repo = AccountRepository::new(state.pool.clone());
    if !repo.revoke_global_role(account_id, role.as_str()).await? {
        return Err(ApiError::NotFound(format!(
            "Account does not hold the {} role",
            role
        )));
    }

    tracing::info!(
        account_id,
        role = %role,
        revoked_by = auth.account_id(),
        "Global role revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::Requestor;

    #[test]
    fn test_require_admin() {
        let admin = Authenticated(Requestor::new(1, [GlobalRole::Admin]));
        let member = Authenticated(Requestor::new(2, [GlobalRole::Member]));
        assert!(require_admin(&admin).is_ok());
        assert!(matches!(
            require_admin(&member),
            Err(ApiError::Forbidden(_))
        ));
    }
}
