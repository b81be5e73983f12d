use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::non_blank;
use crate::error::CoreError;
use crate::list::item::{ListItem, ListQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[serde(alias = "USER")]
    User,
    #[serde(alias = "ADMIN")]
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(CoreError::InvalidFilter(format!(
                "role must be user or admin, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// Derived account status. The backend has no status field, so accounts
    /// whose email mentions `test` (and not `admin`) count as inactive.
    pub fn is_active(&self) -> bool {
        self.email.contains("admin") || !self.email.contains("test")
    }
}

impl ListItem for User {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.email.as_str()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserStatus {
    #[default]
    All,
    Active,
    Inactive,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        })
    }
}

impl FromStr for UserStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(CoreError::InvalidFilter(format!(
                "user status must be all, active or inactive, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub search: Option<String>,
    pub status: UserStatus,
    /// Sent to the server; `None` lists every role.
    pub role: Option<UserRole>,
}

impl UserQuery {
    pub fn with_search(self, search: Option<String>) -> Self {
        Self {
            search: non_blank(search),
            ..self
        }
    }

    pub fn with_status(self, status: UserStatus) -> Self {
        Self { status, ..self }
    }

    pub fn with_role(self, role: Option<UserRole>) -> Self {
        Self { role, ..self }
    }
}

impl ListQuery<User> for UserQuery {
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn server_filters(&self) -> BTreeMap<String, String> {
        self.role
            .map(|role| ("role".to_string(), role.as_str().to_string()))
            .into_iter()
            .collect()
    }

    fn matches_status(&self, item: &User) -> bool {
        match self.status {
            UserStatus::All => true,
            UserStatus::Active => item.is_active(),
            UserStatus::Inactive => !item.is_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::refine::refine_with_query;

    fn users() -> Vec<User> {
        serde_json::from_str(
            r#"[
                {"id": 1, "email": "admin@pixelforge.io", "role": "ADMIN"},
                {"id": 2, "email": "test.buyer@example.com", "role": "USER"},
                {"id": 3, "email": "jane@example.com", "role": "user",
                 "created_at": "2024-05-05T12:00:00Z"},
                {"id": 4, "email": "test-admin@example.com", "role": "admin"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn roles_decode_in_either_case() {
        let items = users();
        assert_eq!(items[0].role, UserRole::Admin);
        assert_eq!(items[2].role, UserRole::User);
    }

    #[test]
    fn derived_status() {
        let items = users();
        assert!(items[0].is_active());
        assert!(!items[1].is_active());
        assert!(items[2].is_active());
        assert!(items[3].is_active());
    }

    #[test]
    fn inactive_filter_is_client_side() {
        let query = UserQuery::default().with_status(UserStatus::Inactive);
        assert!(query.server_filters().is_empty());
        let ids: Vec<u64> = refine_with_query(&users(), &query)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn role_is_a_server_filter() {
        let query = UserQuery::default().with_role(Some(UserRole::Admin));
        assert_eq!(
            query.server_filters().get("role").map(String::as_str),
            Some("admin")
        );
    }

    #[test]
    fn search_matches_email_only() {
        let query = UserQuery::default().with_search(Some("EXAMPLE".to_string()));
        assert_eq!(refine_with_query(&users(), &query).len(), 3);
    }

    #[test]
    fn role_parsing() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("owner".parse::<UserRole>().is_err());
    }
}
