//! Fetch lifecycle for one paginated table.
//!
//! [`ListController`] owns the current query, page position and the last
//! page it applied. Every fetch gets a [`FetchTicket`] carrying a
//! generation number and a cancellation token; starting a new fetch
//! cancels the previous token, and results whose generation is no longer
//! current are dropped instead of overwriting newer data.
//!
//! Callers that want to overlap fetches (e.g. spawn them on a runtime and
//! feed the results back through a channel) use [`ListController::begin_fetch`],
//! [`run_ticket`] and [`ListController::apply`] separately; everyone else
//! calls [`ListController::fetch`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::list::item::{ListItem, ListQuery};
use crate::list::pagination::PaginationState;
use crate::list::refine::refine_with_query;
use crate::list::source::{PageRequest, PageResult, PageSource};

type ItemOf<S> = <S as PageSource>::Item;
type IdOf<S> = <ItemOf<S> as ListItem>::Id;

/// How many times [`ListController::fetch`] follows a shrinking collection.
const MAX_SHRINK_FOLLOWS: usize = 3;

/// Where the controller is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; holds a human-readable message.
    Failed(String),
}

/// What happens to the previously loaded page when a fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Drop the old rows; the table shows only the error.
    #[default]
    Clear,
    /// Keep the old rows on screen next to the error.
    Retain,
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: PageRequest,
    pub token: CancellationToken,
}

impl FetchTicket {
    pub fn page(&self) -> u32 {
        self.request.page()
    }
}

/// Result of handing a fetch result back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page was stored.
    Applied,
    /// The fetch failed and the controller moved to [`FetchState::Failed`].
    Failed,
    /// A newer fetch has started since; the result was dropped.
    Stale,
    /// The fetch was cancelled; nothing changed.
    Cancelled,
    /// The requested page does not exist; nothing was fetched.
    Ignored,
    /// The collection shrank below the requested page. Pagination moved to
    /// the new last page and the rows were dropped; fetch
    /// [`ListController::current_page`] to fill it.
    Shrunk,
}

/// Runs `ticket` against `source`, racing it against the ticket's token.
///
/// Returns [`CoreError::Cancelled`] if the token fires first.
pub async fn run_ticket<S>(source: &S, ticket: &FetchTicket) -> CoreResult<PageResult<S::Item>>
where
    S: PageSource + ?Sized,
{
    tokio::select! {
        _ = ticket.token.cancelled() => Err(CoreError::Cancelled),
        result = source.fetch_page(ticket.request.clone()) => result,
    }
}

/// Paginated fetch controller for one table.
pub struct ListController<S: PageSource> {
    source: Arc<S>,
    query: S::Query,
    pagination: PaginationState,
    items: Vec<ItemOf<S>>,
    state: FetchState,
    generation: u64,
    in_flight: Option<CancellationToken>,
    stale_policy: StalePolicy,
}

impl<S: PageSource> ListController<S> {
    pub fn new(source: Arc<S>, page_size: u32) -> Self {
        Self {
            source,
            query: S::Query::default(),
            pagination: PaginationState::new(page_size),
            items: Vec::new(),
            state: FetchState::Idle,
            generation: 0,
            in_flight: None,
            stale_policy: StalePolicy::default(),
        }
    }

    pub fn with_stale_policy(self, stale_policy: StalePolicy) -> Self {
        Self {
            stale_policy,
            ..self
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn query(&self) -> &S::Query {
        &self.query
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    /// Message of the last failure, if the controller is in `Failed`.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn current_page(&self) -> u32 {
        self.pagination.current_page()
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages()
    }

    /// Server-reported total, before client-side refinement.
    pub fn total(&self) -> u64 {
        self.pagination.total_items()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Raw rows of the last applied page.
    pub fn items(&self) -> &[ItemOf<S>] {
        &self.items
    }

    /// Rows of the current page after search and status refinement.
    pub fn visible_items(&self) -> Vec<ItemOf<S>> {
        refine_with_query(&self.items, &self.query)
    }

    pub fn visible_ids(&self) -> Vec<IdOf<S>> {
        self.visible_items().iter().map(|item| item.id()).collect()
    }

    /// Replaces the query without fetching. The page position is reset.
    pub fn set_query_deferred(&mut self, query: S::Query) {
        debug!(?query, "query changed");
        self.query = query;
        self.pagination = self.pagination.reset();
    }

    /// Starts a fetch for `page` and returns its ticket.
    ///
    /// Enters `Loading`, clears any previous error and cancels whatever
    /// fetch was in flight.
    pub fn begin_fetch(&mut self, page: u32) -> FetchTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        self.state = FetchState::Loading;

        let request = PageRequest::for_page(page, self.pagination.page_size())
            .with_filters(self.query.server_filters());
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        debug!(generation = self.generation, page, "fetch started");
        FetchTicket {
            generation: self.generation,
            request,
            token,
        }
    }

    /// Applies the result of `ticket` if it is still the current fetch.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: CoreResult<PageResult<ItemOf<S>>>,
    ) -> ApplyOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "dropping stale fetch result"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Err(CoreError::Cancelled) => {
                debug!(generation = ticket.generation, "fetch cancelled");
                ApplyOutcome::Cancelled
            }
            Ok(mut page) => {
                self.in_flight = None;
                let limit = ticket.request.limit as usize;
                if page.items.len() > limit {
                    warn!(
                        received = page.items.len(),
                        limit, "page larger than requested limit, truncating"
                    );
                    page.items.truncate(limit);
                }
                let pagination = self.pagination.with_total(page.total).go_to(ticket.page());
                if pagination.current_page() != ticket.page() {
                    info!(
                        requested = ticket.page(),
                        last = pagination.current_page(),
                        total = page.total,
                        "requested page no longer exists"
                    );
                    self.pagination = pagination;
                    return ApplyOutcome::Shrunk;
                }
                self.pagination = pagination;
                info!(
                    page = self.pagination.current_page(),
                    rows = page.items.len(),
                    total = page.total,
                    "page loaded"
                );
                self.items = page.items;
                self.state = FetchState::Loaded;
                ApplyOutcome::Applied
            }
            Err(e) => {
                self.in_flight = None;
                error!(error = %e, "fetch failed");
                if self.stale_policy == StalePolicy::Clear {
                    self.items.clear();
                }
                self.state = FetchState::Failed(e.to_string());
                ApplyOutcome::Failed
            }
        }
    }

    /// Fetches `page` and applies the result.
    ///
    /// If the collection shrank below `page`, the new last page is fetched
    /// instead, so the stored rows always belong to [`Self::current_page`].
    pub async fn fetch(&mut self, page: u32) -> ApplyOutcome {
        let mut page = page;
        let mut follows = 0;
        loop {
            let ticket = self.begin_fetch(page);
            let result = run_ticket(self.source.as_ref(), &ticket).await;
            let outcome = self.apply(&ticket, result);
            if outcome != ApplyOutcome::Shrunk || follows == MAX_SHRINK_FOLLOWS {
                return outcome;
            }
            follows += 1;
            page = self.current_page();
        }
    }

    /// Replaces the query, resets to page 1 and fetches.
    pub async fn set_query(&mut self, query: S::Query) -> ApplyOutcome {
        self.set_query_deferred(query);
        self.fetch(1).await
    }

    /// Fetches `page` if it exists.
    ///
    /// Out-of-range pages are ignored: nothing is fetched and
    /// [`ApplyOutcome::Ignored`] is returned.
    pub async fn go_to_page(&mut self, page: u32) -> ApplyOutcome {
        if !self.pagination.contains(page) {
            let err = CoreError::PageOutOfRange {
                requested: page,
                total_pages: self.total_pages(),
            };
            debug!(%err, "ignoring page change");
            return ApplyOutcome::Ignored;
        }
        self.fetch(page).await
    }

    /// Returns `true` if `page` is a real page of the current collection.
    pub fn can_go_to(&self, page: u32) -> bool {
        self.pagination.contains(page)
    }

    pub async fn next_page(&mut self) -> ApplyOutcome {
        let page = self.current_page().saturating_add(1);
        self.go_to_page(page).await
    }

    pub async fn prev_page(&mut self) -> ApplyOutcome {
        let page = self.current_page().saturating_sub(1);
        self.go_to_page(page).await
    }

    /// Re-fetches the current page with the current query.
    pub async fn refetch(&mut self) -> ApplyOutcome {
        let page = self.current_page();
        self.fetch(page).await
    }
}
