//! Access token extractor.
//!
//! Decodes the bearer token into the [`Requestor`] every policy check needs:
//! the account id and its global roles.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{account::parse_global_roles, Requestor};
use shared::jwt::extract_account_id;

use crate::app::AppState;
use crate::error::ApiError;

/// The authenticated account behind a request.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Requestor);

impl Authenticated {
    pub fn account_id(&self) -> i64 {
        self.0.account_id
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<Authenticated>() {
            return Ok(auth.clone());
        }

        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = bearer_token(header).ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state.jwt.validate_token(token)?;
        let account_id = extract_account_id(&claims)?;
        let global_roles = parse_global_roles(&claims.roles)
            .map_err(|_| ApiError::Unauthorized("Token carries unknown roles".to_string()))?;

        let auth = Authenticated(Requestor {
            account_id,
            global_roles,
        });
        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
