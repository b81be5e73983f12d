//! `/categories/` table wiring.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use url::Url;

use pixelforge_core::{
    BulkAction, BulkOperation, BulkRegistry, Category, CategoryQuery, CoreResult, ItemOutcome,
};

use crate::api::client::ApiClient;
use crate::api::fan_out;
use crate::api::source::RestSource;

pub const PATH: &str = "categories/";

pub type CategorySource = RestSource<Category, CategoryQuery>;

pub fn source(client: Arc<ApiClient>) -> CategorySource {
    RestSource::new(client, PATH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMutation {
    SetActive(bool),
    /// Hard delete; the category is removed, not just deactivated.
    Delete,
}

impl CategoryMutation {
    /// Method, URL and optional JSON body of the call for one category.
    pub fn request(
        self,
        client: &ApiClient,
        id: &str,
    ) -> CoreResult<(Method, Url, Option<serde_json::Value>)> {
        let mut url = client.url(&format!("{PATH}{id}"))?;
        match self {
            Self::SetActive(active) => Ok((Method::PUT, url, Some(json!({ "is_active": active })))),
            Self::Delete => {
                url.query_pairs_mut().append_pair("hard_delete", "true");
                Ok((Method::DELETE, url, None))
            }
        }
    }
}

pub struct CategoryAction {
    client: Arc<ApiClient>,
    mutation: CategoryMutation,
}

impl CategoryAction {
    pub fn new(client: Arc<ApiClient>, mutation: CategoryMutation) -> Self {
        Self { client, mutation }
    }

    async fn apply(&self, id: String) -> CoreResult<()> {
        let (method, url, body) = self.mutation.request(&self.client, &id)?;
        self.client.send(method, url, body.as_ref()).await
    }
}

#[async_trait]
impl BulkAction<String> for CategoryAction {
    async fn run(&self, ids: &[String]) -> CoreResult<Vec<ItemOutcome<String>>> {
        Ok(fan_out(ids, |id| self.apply(id)).await)
    }
}

/// Bulk operations offered by the categories table.
pub fn operations(client: Arc<ApiClient>) -> BulkRegistry<String> {
    let action = |mutation| Arc::new(CategoryAction::new(client.clone(), mutation));
    BulkRegistry::new()
        .with(
            BulkOperation::new(
                "activate",
                "Activate",
                action(CategoryMutation::SetActive(true)),
            )
            .with_description("Activate the selected categories"),
        )
        .with(
            BulkOperation::new(
                "deactivate",
                "Deactivate",
                action(CategoryMutation::SetActive(false)),
            )
            .with_description("Deactivate the selected categories"),
        )
        .with(
            BulkOperation::new("delete", "Delete", action(CategoryMutation::Delete))
                .with_description("Permanently remove the selected categories")
                .with_confirmation(
                    "Are you sure you want to delete the selected categories? \
                     This action cannot be undone.",
                )
                .destructive(),
        )
}
