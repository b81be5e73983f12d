//! The page-fetch contract between a table and the remote collection.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::list::item::{ListItem, ListQuery};

/// Input of one fetch cycle. Built per fetch and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u64,
    pub limit: u32,
    pub filters: BTreeMap<String, String>,
}

impl PageRequest {
    /// Request for the 1-based `page` with `limit` items per page.
    ///
    /// `page` 0 is treated as page 1 and `limit` 0 as 1.
    pub fn for_page(page: u32, limit: u32) -> Self {
        let limit = limit.max(1);
        let skip = u64::from(page.max(1) - 1) * u64::from(limit);
        Self {
            skip,
            limit,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_filters(self, filters: BTreeMap<String, String>) -> Self {
        Self { filters, ..self }
    }

    /// Returns the 1-based page this request addresses.
    pub fn page(&self) -> u32 {
        let page = self.skip / u64::from(self.limit.max(1)) + 1;
        u32::try_from(page).unwrap_or(u32::MAX)
    }
}

/// Output of one fetch cycle.
///
/// `total` is the server-side count before any client-side refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// A remote collection that can be read one page at a time.
///
/// Implementations must report HTTP and transport failures as typed
/// errors (`CoreError::Http`, `CoreError::Network`, `CoreError::Decode`).
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: ListItem;
    type Query: ListQuery<Self::Item>;

    async fn fetch_page(&self, request: PageRequest) -> CoreResult<PageResult<Self::Item>>;
}
