//! Catalog entities shown by the admin console.
//!
//! Each entity implements [`ListItem`](crate::list::ListItem) and comes with
//! a query type that splits its filters between the server and the client.

pub mod category;
pub mod product;
pub mod user;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub use category::{Category, CategoryQuery, CategoryStatus};
pub use product::{Product, ProductQuery, ProductStatus};
pub use user::{User, UserQuery, UserRole, UserStatus};

/// The tables the console can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Products,
    Categories,
    Users,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Products, Self::Categories, Self::Users];

    pub fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Users => "users",
        }
    }

    /// Rows per page when the configuration does not override it.
    pub fn default_page_size(self) -> u32 {
        match self {
            Self::Products | Self::Categories => 12,
            Self::Users => 10,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::InvalidFilter(format!("unknown entity: {s}")))
    }
}

/// Normalises an optional free-text filter: blank becomes `None`.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
