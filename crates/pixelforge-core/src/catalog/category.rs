use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::non_blank;
use crate::error::CoreError;
use crate::list::item::{ListItem, ListQuery};

/// A category as returned by `/categories/`. Ids are ObjectId strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ListItem for Category {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryStatus {
    #[default]
    All,
    Active,
    Inactive,
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        })
    }
}

impl FromStr for CategoryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(CoreError::InvalidFilter(format!(
                "category status must be all, active or inactive, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryQuery {
    pub search: Option<String>,
    pub status: CategoryStatus,
}

impl CategoryQuery {
    pub fn with_search(self, search: Option<String>) -> Self {
        Self {
            search: non_blank(search),
            ..self
        }
    }

    pub fn with_status(self, status: CategoryStatus) -> Self {
        Self { status, ..self }
    }
}

impl ListQuery<Category> for CategoryQuery {
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn server_filters(&self) -> BTreeMap<String, String> {
        let mut filters = BTreeMap::new();
        if self.status == CategoryStatus::Active {
            filters.insert("active_only".to_string(), "true".to_string());
        }
        filters
    }

    fn matches_status(&self, item: &Category) -> bool {
        match self.status {
            CategoryStatus::Inactive => !item.is_active,
            CategoryStatus::All | CategoryStatus::Active => true,
        }
    }
}
