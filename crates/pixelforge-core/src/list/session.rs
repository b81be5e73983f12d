//! One mounted table: fetch controller, selection and bulk executor wired
//! together behind the [`Command`]/[`Event`] interface.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::event::{Command, Event};
use crate::list::bulk::{BulkExecutor, BulkOperation, BulkOutcome, BulkRegistry, BulkStep};
use crate::list::controller::{ApplyOutcome, ListController};
use crate::list::item::ListItem;
use crate::list::selection::Selection;
use crate::list::source::PageSource;
use crate::notify::{NotifyLevel, Notifier};

type IdOf<S> = <<S as PageSource>::Item as ListItem>::Id;

const DEFAULT_BULK_TIMEOUT: Duration = Duration::from_secs(30);

/// Table session for a single entity list.
///
/// The selection always mirrors the rows currently on screen: after every
/// applied fetch it is intersected with the new visible ids.
pub struct ListSession<S: PageSource> {
    controller: ListController<S>,
    selection: Selection<IdOf<S>>,
    executor: BulkExecutor<IdOf<S>>,
    operations: BulkRegistry<IdOf<S>>,
    notifier: Arc<dyn Notifier>,
    bulk_timeout: Duration,
    noun: String,
}

impl<S: PageSource> ListSession<S> {
    pub fn new(
        controller: ListController<S>,
        operations: BulkRegistry<IdOf<S>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            controller,
            selection: Selection::new(),
            executor: BulkExecutor::new(),
            operations,
            notifier,
            bulk_timeout: DEFAULT_BULK_TIMEOUT,
            noun: "items".to_string(),
        }
    }

    pub fn with_bulk_timeout(self, bulk_timeout: Duration) -> Self {
        Self {
            bulk_timeout,
            ..self
        }
    }

    /// Plural noun used in notifications, e.g. `"products"`.
    pub fn with_noun(self, noun: impl Into<String>) -> Self {
        Self {
            noun: noun.into(),
            ..self
        }
    }

    pub fn controller(&self) -> &ListController<S> {
        &self.controller
    }

    pub fn selection(&self) -> &Selection<IdOf<S>> {
        &self.selection
    }

    pub fn executor(&self) -> &BulkExecutor<IdOf<S>> {
        &self.executor
    }

    pub fn operations(&self) -> &BulkRegistry<IdOf<S>> {
        &self.operations
    }

    pub fn noun(&self) -> &str {
        &self.noun
    }

    /// Processes one command.
    ///
    /// Fetch and bulk-action failures are reported as events and
    /// notifications. `Err` is reserved for requests that cannot be
    /// started at all: an unknown operation id or an empty selection.
    pub async fn handle(
        &mut self,
        command: Command<S::Query, IdOf<S>>,
    ) -> CoreResult<Vec<Event<IdOf<S>>>> {
        let mut events = Vec::new();

        match command {
            Command::SetQuery(query) => {
                let outcome = self.controller.set_query(query).await;
                self.after_fetch(outcome, 1, &mut events);
            }
            Command::GoToPage(page) => {
                let outcome = self.controller.go_to_page(page).await;
                self.after_fetch(outcome, page, &mut events);
            }
            Command::NextPage => {
                let page = self.controller.current_page().saturating_add(1);
                let outcome = self.controller.next_page().await;
                self.after_fetch(outcome, page, &mut events);
            }
            Command::PrevPage => {
                let page = self.controller.current_page().saturating_sub(1);
                let outcome = self.controller.prev_page().await;
                self.after_fetch(outcome, page, &mut events);
            }
            Command::Refetch => {
                let page = self.controller.current_page();
                let outcome = self.controller.refetch().await;
                self.after_fetch(outcome, page, &mut events);
            }
            Command::Toggle(id) => {
                self.update_selection(|s| s.toggle(&id), &mut events);
            }
            Command::SelectAll => {
                self.update_selection(Selection::select_all, &mut events);
            }
            Command::ToggleAll => {
                self.update_selection(Selection::toggle_all, &mut events);
            }
            Command::ClearSelection => {
                self.update_selection(Selection::clear, &mut events);
            }
            Command::RunBulk(operation_id) => {
                let operation = self.operation(&operation_id)?;
                let ids = self.selection.selected_ids();
                match self.executor.request(&operation, ids.clone())? {
                    BulkStep::NeedsConfirmation { prompt } => {
                        events.push(Event::ConfirmationRequired {
                            operation_id,
                            prompt,
                        });
                    }
                    BulkStep::Execute => self.run_bulk(&operation, ids, &mut events).await,
                }
            }
            Command::Confirm => {
                if let Some((operation_id, ids)) = self.executor.confirm() {
                    let operation = self.operation(&operation_id)?;
                    self.run_bulk(&operation, ids, &mut events).await;
                } else {
                    debug!("confirm with nothing pending");
                }
            }
            Command::Cancel => {
                if self.executor.cancel() {
                    events.push(Event::BulkCancelled);
                }
            }
        }

        Ok(events)
    }

    fn operation(&self, operation_id: &str) -> CoreResult<BulkOperation<IdOf<S>>> {
        self.operations
            .find_by_id(operation_id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownOperation(operation_id.to_string()))
    }

    fn update_selection<F>(&mut self, f: F, events: &mut Vec<Event<IdOf<S>>>)
    where
        F: FnOnce(Selection<IdOf<S>>) -> Selection<IdOf<S>>,
    {
        let selection = std::mem::take(&mut self.selection);
        self.selection = f(selection);
        events.push(Event::SelectionChanged {
            state: self.selection.state(),
            selected: self.selection.len(),
        });
    }

    fn after_fetch(
        &mut self,
        outcome: ApplyOutcome,
        requested: u32,
        events: &mut Vec<Event<IdOf<S>>>,
    ) {
        match outcome {
            ApplyOutcome::Applied => {
                let visible = self.controller.visible_ids();
                let count = visible.len();
                let before = self.selection.len();
                self.revalidate_selection(visible);
                events.push(Event::PageLoaded {
                    page: self.controller.current_page(),
                    total_pages: self.controller.total_pages(),
                    visible: count,
                    total: self.controller.total(),
                });
                if self.selection.len() != before {
                    events.push(Event::SelectionChanged {
                        state: self.selection.state(),
                        selected: self.selection.len(),
                    });
                }
            }
            ApplyOutcome::Failed => {
                let error = self
                    .controller
                    .error()
                    .unwrap_or("unknown error")
                    .to_string();
                self.notifier
                    .notify(NotifyLevel::Error, &format!("Failed to load {}", self.noun));
                let visible = self.controller.visible_ids();
                self.revalidate_selection(visible);
                events.push(Event::FetchFailed { error });
            }
            ApplyOutcome::Ignored => events.push(Event::PageIgnored { requested }),
            ApplyOutcome::Stale | ApplyOutcome::Cancelled | ApplyOutcome::Shrunk => {}
        }
    }

    fn revalidate_selection(&mut self, visible: Vec<IdOf<S>>) {
        let selection = std::mem::take(&mut self.selection);
        self.selection = selection.with_visible(visible);
    }

    async fn run_bulk(
        &mut self,
        operation: &BulkOperation<IdOf<S>>,
        ids: Vec<IdOf<S>>,
        events: &mut Vec<Event<IdOf<S>>>,
    ) {
        let outcome = self
            .executor
            .execute(operation, ids, self.bulk_timeout)
            .await;

        match outcome {
            BulkOutcome::Completed(report) => {
                self.notifier.notify(
                    NotifyLevel::Success,
                    &format!(
                        "Successfully {} {} {}",
                        operation.label.to_lowercase(),
                        report.succeeded.len(),
                        self.noun
                    ),
                );
                self.update_selection(Selection::clear, events);
                events.push(Event::BulkCompleted(report));
                self.refresh_after_bulk(events).await;
            }
            BulkOutcome::Partial(report) => {
                self.notifier.notify(
                    NotifyLevel::Warning,
                    &format!("{}: {}", operation.label, report.summary()),
                );
                let failed = report.failed_ids();
                self.update_selection(|s| s.retain_only(&failed), events);
                events.push(Event::BulkPartial(report));
                self.refresh_after_bulk(events).await;
            }
            BulkOutcome::Failed(reason) => {
                self.notifier.notify(
                    NotifyLevel::Error,
                    &format!(
                        "Failed to {} {}: {reason}",
                        operation.label.to_lowercase(),
                        self.noun
                    ),
                );
                events.push(Event::BulkFailed {
                    operation_id: operation.id.clone(),
                    reason,
                });
            }
        }
    }

    async fn refresh_after_bulk(&mut self, events: &mut Vec<Event<IdOf<S>>>) {
        let page = self.controller.current_page();
        let outcome = self.controller.refetch().await;
        self.after_fetch(outcome, page, events);
    }
}
