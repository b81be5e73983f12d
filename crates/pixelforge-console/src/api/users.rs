//! `/users/` table wiring. The backend exposes no bulk user endpoints, so
//! the users table is read-only.

use std::sync::Arc;

use pixelforge_core::{BulkRegistry, User, UserQuery};

use crate::api::client::ApiClient;
use crate::api::source::RestSource;

pub const PATH: &str = "users/";

pub type UserSource = RestSource<User, UserQuery>;

pub fn source(client: Arc<ApiClient>) -> UserSource {
    RestSource::new(client, PATH)
}

pub fn operations() -> BulkRegistry<u64> {
    BulkRegistry::new()
}
