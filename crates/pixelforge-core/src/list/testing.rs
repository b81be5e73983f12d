//! In-memory fixtures shared by the list tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CoreError, CoreResult};
use crate::list::bulk::{BulkAction, ItemOutcome};
use crate::list::item::{ListItem, ListQuery};
use crate::list::source::{PageRequest, PageResult, PageSource};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Row {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub flagged: bool,
}

pub(crate) fn row(id: u64, title: &str, description: &str) -> Row {
    Row {
        id,
        title: title.to_string(),
        description: description.to_string(),
        flagged: false,
    }
}

pub(crate) fn rows(count: u64) -> Vec<Row> {
    (1..=count)
        .map(|i| row(i, &format!("Item {i}"), "plain"))
        .collect()
}

impl ListItem for Row {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RowQuery {
    pub search: Option<String>,
    pub flagged_only: bool,
}

impl ListQuery<Row> for RowQuery {
    fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    fn server_filters(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn matches_status(&self, item: &Row) -> bool {
        !self.flagged_only || item.flagged
    }
}

/// A page source backed by a vector, with switchable failures and delays.
#[derive(Default)]
pub(crate) struct MemorySource {
    rows: Mutex<Vec<Row>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Option<Duration>>,
    requests: Mutex<Vec<PageRequest>>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    pub fn set_rows(&self, rows: Vec<Row>) {
        *self.rows.lock().unwrap() = rows;
    }

    pub fn remove(&self, ids: &[u64]) {
        self.rows.lock().unwrap().retain(|r| !ids.contains(&r.id));
    }

    pub fn fail_with(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageSource for MemorySource {
    type Item = Row;
    type Query = RowQuery;

    async fn fetch_page(&self, request: PageRequest) -> CoreResult<PageResult<Row>> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(CoreError::Network(message));
        }
        let rows = self.rows.lock().unwrap().clone();
        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(request.skip as usize)
            .take(request.limit as usize)
            .collect();
        Ok(PageResult::new(items, total))
    }
}

/// A bulk action that deletes the given ids from a [`MemorySource`].
pub(crate) struct RemovingAction {
    source: Arc<MemorySource>,
}

impl RemovingAction {
    pub fn new(source: Arc<MemorySource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl BulkAction<u64> for RemovingAction {
    async fn run(&self, ids: &[u64]) -> CoreResult<Vec<ItemOutcome<u64>>> {
        self.source.remove(ids);
        Ok(ids.iter().map(|id| ItemOutcome::ok(*id)).collect())
    }
}

/// A bulk action that records every invocation.
#[derive(Default)]
pub(crate) struct RecordingAction {
    calls: Mutex<Vec<Vec<u64>>>,
    failing_ids: BTreeSet<u64>,
    batch_error: Option<String>,
    delay: Option<Duration>,
    skip_ids: BTreeSet<u64>,
}

impl RecordingAction {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing(ids: &[u64]) -> Self {
        Self {
            failing_ids: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn batch_error(message: &str) -> Self {
        Self {
            batch_error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn silent_about(ids: &[u64]) -> Self {
        Self {
            skip_ids: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<u64>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BulkAction<u64> for RecordingAction {
    async fn run(&self, ids: &[u64]) -> CoreResult<Vec<ItemOutcome<u64>>> {
        self.calls.lock().unwrap().push(ids.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.batch_error {
            return Err(CoreError::BulkAction(message.clone()));
        }
        Ok(ids
            .iter()
            .filter(|id| !self.skip_ids.contains(id))
            .map(|id| {
                if self.failing_ids.contains(id) {
                    ItemOutcome::failed(*id, "rejected")
                } else {
                    ItemOutcome::ok(*id)
                }
            })
            .collect())
    }
}
