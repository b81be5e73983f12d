use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use pixelforge_core::{CoreResult, ListItem, ListQuery, PageRequest, PageResult, PageSource};

use crate::api::client::ApiClient;

/// [`PageSource`] backed by one REST collection endpoint.
pub struct RestSource<T, Q> {
    client: Arc<ApiClient>,
    path: &'static str,
    _marker: PhantomData<fn() -> (T, Q)>,
}

impl<T, Q> RestSource<T, Q> {
    pub fn new(client: Arc<ApiClient>, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        self.path
    }
}

#[async_trait]
impl<T, Q> PageSource for RestSource<T, Q>
where
    T: ListItem + DeserializeOwned,
    Q: ListQuery<T>,
{
    type Item = T;
    type Query = Q;

    async fn fetch_page(&self, request: PageRequest) -> CoreResult<PageResult<T>> {
        self.client.get_page(self.path(), &request).await
    }
}
