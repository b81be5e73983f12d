use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::non_blank;
use crate::error::CoreError;
use crate::list::item::{ListItem, ListQuery};

/// A product as returned by `/products/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    pub price: f64,
    pub category_id: u64,
    pub category_name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ListItem for Product {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.short_description.as_deref());
        fields.push(self.category_name.as_str());
        fields
    }
}

/// Product status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductStatus {
    #[default]
    All,
    /// Unlocked products; filtered by the server.
    Active,
    /// Locked products; filtered on the loaded page.
    Locked,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Locked => "locked",
        })
    }
}

impl FromStr for ProductStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "locked" => Ok(Self::Locked),
            other => Err(CoreError::InvalidFilter(format!(
                "product status must be all, active or locked, got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub status: ProductStatus,
    /// Category name; `None` shows every category.
    pub category: Option<String>,
}

impl ProductQuery {
    pub fn with_search(self, search: Option<String>) -> Self {
        Self {
            search: non_blank(search),
            ..self
        }
    }

    pub fn with_status(self, status: ProductStatus) -> Self {
        Self { status, ..self }
    }

    /// `"all"` and blank clear the category filter.
    pub fn with_category(self, category: Option<String>) -> Self {
        let category = non_blank(category).filter(|c| !c.eq_ignore_ascii_case("all"));
        Self { category, ..self }
    }
}

impl ListQuery<Product> for ProductQuery {
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn server_filters(&self) -> BTreeMap<String, String> {
        let mut filters = BTreeMap::new();
        if let Some(category) = &self.category {
            filters.insert("category".to_string(), category.clone());
        }
        if self.status == ProductStatus::Active {
            filters.insert("unlocked_only".to_string(), "true".to_string());
        }
        filters
    }

    fn matches_status(&self, item: &Product) -> bool {
        match self.status {
            ProductStatus::Locked => item.is_locked,
            ProductStatus::All | ProductStatus::Active => true,
        }
    }
}
