//! Application configuration loaded from a TOML file.
//!
//! The default configuration matches the values shown in `config/default.toml`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::EntityKind;
use crate::error::{CoreError, CoreResult};
use crate::list::controller::StalePolicy;

/// Top-level application configuration.
///
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Rows per page for `kind`. Zero falls back to the entity default.
    pub fn page_size(&self, kind: EntityKind) -> u32 {
        let configured = match kind {
            EntityKind::Products => self.list.products_page_size,
            EntityKind::Categories => self.list.categories_page_size,
            EntityKind::Users => self.list.users_page_size,
        };
        if configured == 0 {
            kind.default_page_size()
        } else {
            configured
        }
    }

    pub fn stale_policy(&self) -> StalePolicy {
        if self.list.retain_stale_on_error {
            StalePolicy::Retain
        } else {
            StalePolicy::Clear
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn bulk_timeout(&self) -> Duration {
        Duration::from_secs(self.bulk.timeout_secs)
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token; empty means unauthenticated.
    #[serde(default)]
    pub token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: String::new(),
        }
    }
}

impl ApiConfig {
    pub fn token(&self) -> Option<&str> {
        let token = self.token.trim();
        (!token.is_empty()).then_some(token)
    }
}

/// Table behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_products_page_size")]
    pub products_page_size: u32,
    #[serde(default = "default_categories_page_size")]
    pub categories_page_size: u32,
    #[serde(default = "default_users_page_size")]
    pub users_page_size: u32,
    #[serde(default)]
    pub retain_stale_on_error: bool,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            products_page_size: default_products_page_size(),
            categories_page_size: default_categories_page_size(),
            users_page_size: default_users_page_size(),
            retain_stale_on_error: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_products_page_size() -> u32 {
    EntityKind::Products.default_page_size()
}

fn default_categories_page_size() -> u32 {
    EntityKind::Categories.default_page_size()
}

fn default_users_page_size() -> u32 {
    EntityKind::Users.default_page_size()
}
