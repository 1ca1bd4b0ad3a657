//! Account entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{account::parse_global_roles, Account};
use domain::DomainError;
use sqlx::FromRow;

/// Database row mapping for the accounts table, with the account's global
/// role names aggregated into an array.
#[derive(Debug, Clone, FromRow)]
pub struct AccountEntity {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub password_hash: String,
    pub global_roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AccountEntity> for Account {
    type Error = DomainError;

    fn try_from(entity: AccountEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            avatar: entity.avatar,
            global_roles: parse_global_roles(&entity.global_roles)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::GlobalRole;

    fn entity(roles: &[&str]) -> AccountEntity {
        AccountEntity {
            id: 3,
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            avatar: None,
            password_hash: "$argon2id$...".to_string(),
            global_roles: roles.iter().map(|r| r.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_from_entity() {
        let account = Account::try_from(entity(&["member", "creator"])).unwrap();
        assert_eq!(account.id, 3);
        assert!(account.global_roles.contains(&GlobalRole::Creator));
        assert!(account.global_roles.contains(&GlobalRole::Member));
    }

    #[test]
    fn test_account_from_entity_unknown_role() {
        assert!(Account::try_from(entity(&["superuser"])).is_err());
    }
}
