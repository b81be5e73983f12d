//! Bulk operations over a selection.
//!
//! A [`BulkOperation`] describes one batch action (lock, delete, ...).
//! [`BulkRegistry`] holds the operations a table offers and supports fuzzy
//! lookup for the command palette. [`BulkExecutor`] drives a single run:
//! optional confirmation, one invocation of the action under a timeout,
//! and aggregation of the per-item outcomes into a [`BulkReport`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};

/// Result of applying an action to a single id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome<Id> {
    pub id: Id,
    /// `None` on success, otherwise the failure reason.
    pub error: Option<String>,
}

impl<Id> ItemOutcome<Id> {
    pub fn ok(id: Id) -> Self {
        Self { id, error: None }
    }

    pub fn failed(id: Id, reason: impl Into<String>) -> Self {
        Self {
            id,
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// The asynchronous work behind a bulk operation.
///
/// The action receives every selected id in one call and is responsible for
/// its own fan-out. It reports one [`ItemOutcome`] per id; returning `Err`
/// marks the whole batch as failed.
#[async_trait]
pub trait BulkAction<Id>: Send + Sync
where
    Id: Send + Sync + 'static,
{
    async fn run(&self, ids: &[Id]) -> CoreResult<Vec<ItemOutcome<Id>>>;
}

/// Descriptor of a batch action a table offers. Defined once per table.
#[derive(Clone)]
pub struct BulkOperation<Id> {
    /// Stable identifier, e.g. `"delete"`.
    pub id: String,
    /// Human-readable name, e.g. `"Delete Products"`.
    pub label: String,
    pub description: String,
    pub requires_confirmation: bool,
    pub destructive: bool,
    pub confirm_message: Option<String>,
    pub action: Arc<dyn BulkAction<Id>>,
}

impl<Id> BulkOperation<Id>
where
    Id: Send + Sync + 'static,
{
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        action: Arc<dyn BulkAction<Id>>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            requires_confirmation: false,
            destructive: false,
            confirm_message: None,
            action,
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }

    /// Requires explicit confirmation before the action runs.
    pub fn with_confirmation(self, message: impl Into<String>) -> Self {
        Self {
            requires_confirmation: true,
            confirm_message: Some(message.into()),
            ..self
        }
    }

    pub fn destructive(self) -> Self {
        Self {
            destructive: true,
            ..self
        }
    }

    /// Text shown when asking the user to confirm a run over `count` items.
    pub fn confirmation_prompt(&self, count: usize) -> String {
        let message = self
            .confirm_message
            .as_deref()
            .unwrap_or("Are you sure you want to continue?");
        format!("{message}\nSelected items: {count}")
    }
}

impl<Id> fmt::Debug for BulkOperation<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkOperation")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("requires_confirmation", &self.requires_confirmation)
            .field("destructive", &self.destructive)
            .finish_non_exhaustive()
    }
}

/// Ordered set of operations for one table, with fuzzy search.
#[derive(Debug, Clone)]
pub struct BulkRegistry<Id> {
    operations: Vec<BulkOperation<Id>>,
}

impl<Id> Default for BulkRegistry<Id> {
    fn default() -> Self {
        Self {
            operations: Vec::new(),
        }
    }
}

impl<Id> BulkRegistry<Id>
where
    Id: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `operation`, replacing any earlier operation with the same id.
    pub fn with(mut self, operation: BulkOperation<Id>) -> Self {
        self.operations.retain(|op| op.id != operation.id);
        self.operations.push(operation);
        self
    }

    pub fn all(&self) -> &[BulkOperation<Id>] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&BulkOperation<Id>> {
        self.operations.iter().find(|op| op.id == id)
    }

    /// Fuzzy-matches `query` against label, description and id.
    ///
    /// Returns matches sorted by best score; an empty query returns every
    /// operation in registration order.
    pub fn fuzzy_search(&self, query: &str) -> Vec<&BulkOperation<Id>> {
        if query.is_empty() {
            return self.operations.iter().collect();
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &BulkOperation<Id>)> = self
            .operations
            .iter()
            .filter_map(|op| {
                let label_score = matcher.fuzzy_match(&op.label, query).unwrap_or(0);
                let desc_score = matcher.fuzzy_match(&op.description, query).unwrap_or(0);
                let id_score = matcher.fuzzy_match(&op.id, query).unwrap_or(0);
                let best = label_score.max(desc_score).max(id_score);
                (best > 0).then_some((best, op))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, op)| op).collect()
    }
}

/// Aggregated per-item result of one bulk run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkReport<Id> {
    pub operation_id: String,
    pub label: String,
    pub succeeded: Vec<Id>,
    pub failed: Vec<(Id, String)>,
}

impl<Id> BulkReport<Id> {
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<Id>
    where
        Id: Clone,
    {
        self.failed.iter().map(|(id, _)| id.clone()).collect()
    }

    /// `"3 of 5 succeeded"`.
    pub fn summary(&self) -> String {
        format!("{} of {} succeeded", self.succeeded.len(), self.attempted())
    }
}

/// How a bulk run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkOutcome<Id> {
    /// Every selected item succeeded.
    Completed(BulkReport<Id>),
    /// At least one item failed; the report says which.
    Partial(BulkReport<Id>),
    /// The batch failed as a whole (action error or timeout).
    Failed(String),
}

/// What the caller must do after [`BulkExecutor::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkStep {
    /// Show `prompt` and call [`BulkExecutor::confirm`] or [`BulkExecutor::cancel`].
    NeedsConfirmation { prompt: String },
    /// Go straight to [`BulkExecutor::execute`].
    Execute,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkState<Id> {
    Ready,
    AwaitingConfirmation { operation_id: String, ids: Vec<Id> },
    Executing { operation_id: String },
    Completed(BulkReport<Id>),
    Failed(String),
}

/// Runs bulk operations one at a time for a single table.
#[derive(Debug, Clone)]
pub struct BulkExecutor<Id> {
    state: BulkState<Id>,
}

impl<Id> Default for BulkExecutor<Id> {
    fn default() -> Self {
        Self {
            state: BulkState::Ready,
        }
    }
}

impl<Id> BulkExecutor<Id>
where
    Id: Clone + Eq + fmt::Debug + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BulkState<Id> {
        &self.state
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(self.state, BulkState::AwaitingConfirmation { .. })
    }

    /// Starts a run of `operation` over `ids`.
    ///
    /// Operations that require confirmation park in
    /// [`BulkState::AwaitingConfirmation`]; the action is not touched until
    /// [`confirm`](Self::confirm) is called.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptySelection`] if `ids` is empty.
    pub fn request(&mut self, operation: &BulkOperation<Id>, ids: Vec<Id>) -> CoreResult<BulkStep> {
        if ids.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        if operation.requires_confirmation {
            let prompt = operation.confirmation_prompt(ids.len());
            debug!(operation = %operation.id, count = ids.len(), "awaiting confirmation");
            self.state = BulkState::AwaitingConfirmation {
                operation_id: operation.id.clone(),
                ids,
            };
            return Ok(BulkStep::NeedsConfirmation { prompt });
        }
        Ok(BulkStep::Execute)
    }

    /// Affirms a pending confirmation, returning the operation id and ids to run.
    ///
    /// Returns `None` when nothing is awaiting confirmation.
    pub fn confirm(&mut self) -> Option<(String, Vec<Id>)> {
        match std::mem::replace(&mut self.state, BulkState::Ready) {
            BulkState::AwaitingConfirmation { operation_id, ids } => Some((operation_id, ids)),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Abandons a pending confirmation. Returns `true` if one was pending.
    pub fn cancel(&mut self) -> bool {
        if self.is_awaiting_confirmation() {
            debug!("bulk operation cancelled");
            self.state = BulkState::Ready;
            return true;
        }
        false
    }

    /// Invokes the action exactly once under `timeout` and aggregates the result.
    ///
    /// No retries and no rollback. Ids the action did not report on count
    /// as failed.
    pub async fn execute(
        &mut self,
        operation: &BulkOperation<Id>,
        ids: Vec<Id>,
        timeout: Duration,
    ) -> BulkOutcome<Id> {
        self.state = BulkState::Executing {
            operation_id: operation.id.clone(),
        };
        info!(operation = %operation.id, count = ids.len(), "running bulk operation");

        let result = tokio::time::timeout(timeout, operation.action.run(&ids)).await;
        let outcomes = match result {
            Err(_) => return self.fail(operation, CoreError::Timeout.to_string()),
            Ok(Err(e)) => return self.fail(operation, e.to_string()),
            Ok(Ok(outcomes)) => outcomes,
        };

        let report = aggregate(operation, &ids, outcomes);
        self.state = BulkState::Completed(report.clone());
        if report.is_complete_success() {
            info!(operation = %operation.id, "{}", report.summary());
            BulkOutcome::Completed(report)
        } else {
            warn!(operation = %operation.id, failed = report.failed.len(), "{}", report.summary());
            BulkOutcome::Partial(report)
        }
    }

    fn fail(&mut self, operation: &BulkOperation<Id>, reason: String) -> BulkOutcome<Id> {
        warn!(operation = %operation.id, %reason, "bulk operation failed");
        self.state = BulkState::Failed(reason.clone());
        BulkOutcome::Failed(reason)
    }
}

fn aggregate<Id>(
    operation: &BulkOperation<Id>,
    ids: &[Id],
    outcomes: Vec<ItemOutcome<Id>>,
) -> BulkReport<Id>
where
    Id: Clone + Eq + fmt::Debug,
{
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();

    for id in ids {
        match outcomes.iter().find(|o| &o.id == id) {
            Some(ItemOutcome { error: None, .. }) => succeeded.push(id.clone()),
            Some(ItemOutcome {
                error: Some(reason),
                ..
            }) => failed.push((id.clone(), reason.clone())),
            None => failed.push((id.clone(), "no result reported".to_string())),
        }
    }

    for outcome in outcomes.iter().filter(|o| !ids.contains(&o.id)) {
        debug!(id = ?outcome.id, "ignoring outcome for id that was not requested");
    }

    BulkReport {
        operation_id: operation.id.clone(),
        label: operation.label.clone(),
        succeeded,
        failed,
    }
}
