//! Accounts, global roles and the authenticated requestor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::DomainError;

/// Account-wide role, independent of any course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalRole {
    /// May list and delete every course
    Admin,
    /// May create courses
    Creator,
    /// Baseline role granted at registration
    Member,
}

impl GlobalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalRole::Admin => "admin",
            GlobalRole::Creator => "creator",
            GlobalRole::Member => "member",
        }
    }
}

impl FromStr for GlobalRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(GlobalRole::Admin),
            "creator" => Ok(GlobalRole::Creator),
            "member" => Ok(GlobalRole::Member),
            _ => Err(DomainError::InvalidRole(format!(
                "'{}' is not a global role",
                s
            ))),
        }
    }
}

impl fmt::Display for GlobalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses a list of global role names, failing on the first unknown one.
pub fn parse_global_roles<I, S>(names: I) -> Result<BTreeSet<GlobalRole>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().parse::<GlobalRole>())
        .collect()
}

/// The account making a request, as decoded from its access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requestor {
    pub account_id: i64,
    pub global_roles: BTreeSet<GlobalRole>,
}

impl Requestor {
    pub fn new(account_id: i64, global_roles: impl IntoIterator<Item = GlobalRole>) -> Self {
        Self {
            account_id,
            global_roles: global_roles.into_iter().collect(),
        }
    }

    pub fn has_global_role(&self, role: GlobalRole) -> bool {
        self.global_roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_global_role(GlobalRole::Admin)
    }

    pub fn is_creator(&self) -> bool {
        self.has_global_role(GlobalRole::Creator)
    }
}

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub global_roles: BTreeSet<GlobalRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn role_names(&self) -> Vec<String> {
        self.global_roles
            .iter()
            .map(|role| role.as_str().to_string())
            .collect()
    }
}

/// Request payload for registering an account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "shared::password::validate_password_strength"))]
    pub password: String,

    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar: Option<String>,
}

/// Request payload for logging in.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub global_roles: BTreeSet<GlobalRole>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            avatar: account.avatar,
            global_roles: account.global_roles,
            created_at: account.created_at,
        }
    }
}

/// Response for a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account: AccountResponse,
}
