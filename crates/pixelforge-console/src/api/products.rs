//! `/products/` table wiring.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

use pixelforge_core::{
    BulkAction, BulkOperation, BulkRegistry, CoreResult, ItemOutcome, Product, ProductQuery,
};

use crate::api::client::ApiClient;
use crate::api::fan_out;
use crate::api::source::RestSource;

pub const PATH: &str = "products/";

pub type ProductSource = RestSource<Product, ProductQuery>;

pub fn source(client: Arc<ApiClient>) -> ProductSource {
    RestSource::new(client, PATH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductMutation {
    Lock,
    Unlock,
    Delete,
}

impl ProductMutation {
    /// Method and URL of the call for one product.
    pub fn request(self, client: &ApiClient, id: u64) -> CoreResult<(Method, Url)> {
        match self {
            Self::Lock => Ok((Method::PATCH, client.url(&format!("{PATH}{id}/lock"))?)),
            Self::Unlock => Ok((Method::PATCH, client.url(&format!("{PATH}{id}/unlock"))?)),
            Self::Delete => Ok((Method::DELETE, client.url(&format!("{PATH}{id}"))?)),
        }
    }
}

/// One product mutation applied to each selected id.
pub struct ProductAction {
    client: Arc<ApiClient>,
    mutation: ProductMutation,
}

impl ProductAction {
    pub fn new(client: Arc<ApiClient>, mutation: ProductMutation) -> Self {
        Self { client, mutation }
    }

    async fn apply(&self, id: u64) -> CoreResult<()> {
        let (method, url) = self.mutation.request(&self.client, id)?;
        self.client.send(method, url, None).await
    }
}

#[async_trait]
impl BulkAction<u64> for ProductAction {
    async fn run(&self, ids: &[u64]) -> CoreResult<Vec<ItemOutcome<u64>>> {
        Ok(fan_out(ids, |id| self.apply(id)).await)
    }
}

/// Bulk operations offered by the products table.
pub fn operations(client: Arc<ApiClient>) -> BulkRegistry<u64> {
    let action = |mutation| Arc::new(ProductAction::new(client.clone(), mutation));
    BulkRegistry::new()
        .with(
            BulkOperation::new("lock", "Lock Products", action(ProductMutation::Lock))
                .with_description("Hide the selected products from customers"),
        )
        .with(
            BulkOperation::new("unlock", "Unlock Products", action(ProductMutation::Unlock))
                .with_description("Make the selected products visible again"),
        )
        .with(
            BulkOperation::new("delete", "Delete Products", action(ProductMutation::Delete))
                .with_description("Permanently remove the selected products")
                .with_confirmation("This action cannot be undone.")
                .destructive(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> Arc<ApiClient> {
        Arc::new(ApiClient::new("http://localhost:8000", Duration::from_secs(5), None).unwrap())
    }

    #[test]
    fn mutation_endpoints() {
        let api = client();
        let (method, url) = ProductMutation::Lock.request(&api, 7).unwrap();
        assert_eq!(method, Method::PATCH);
        assert_eq!(url.as_str(), "http://localhost:8000/products/7/lock");

        let (method, url) = ProductMutation::Unlock.request(&api, 7).unwrap();
        assert_eq!(method, Method::PATCH);
        assert_eq!(url.path(), "/products/7/unlock");

        let (method, url) = ProductMutation::Delete.request(&api, 7).unwrap();
        assert_eq!(method, Method::DELETE);
        assert_eq!(url.path(), "/products/7");
    }

    #[test]
    fn only_delete_needs_confirmation() {
        let ops = operations(client());
        assert_eq!(ops.len(), 3);
        assert!(!ops.find_by_id("lock").unwrap().requires_confirmation);
        assert!(!ops.find_by_id("unlock").unwrap().requires_confirmation);
        let delete = ops.find_by_id("delete").unwrap();
        assert!(delete.requires_confirmation);
        assert!(delete.destructive);
    }

    #[test]
    fn source_path() {
        assert_eq!(source(client()).path(), "products/");
    }
}
