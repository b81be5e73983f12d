//! Interactive table application: one [`ListSession`] driven by text input.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use pixelforge_core::{
    BulkRegistry, CategoryQuery, Command, Config, CoreError, CoreResult, EntityKind, Event,
    ListController, ListItem, ListSession, MemoryNotifier, Notifier, PageSource, ProductQuery,
    TracingNotifier, UserQuery,
};

use crate::input::{parse_line, Filter, InputAction, HELP};
use crate::render::{render_event, render_operations, render_page_bar, render_table, TableRow};

type IdOf<S> = <<S as PageSource>::Item as ListItem>::Id;

/// Applies a [`Filter`] to a table query.
pub trait QueryInput: Sized {
    fn apply_filter(self, filter: &Filter) -> CoreResult<Self>;
}

fn unsupported(filter: &str, kind: EntityKind) -> CoreError {
    CoreError::InvalidFilter(format!("{kind} cannot be filtered by {filter}"))
}

impl QueryInput for ProductQuery {
    fn apply_filter(self, filter: &Filter) -> CoreResult<Self> {
        match filter {
            Filter::Search(term) => Ok(self.with_search(term.clone())),
            Filter::Status(status) => Ok(self.with_status(status.parse()?)),
            Filter::Category(category) => Ok(self.with_category(category.clone())),
            Filter::Role(_) => Err(unsupported("role", EntityKind::Products)),
        }
    }
}

impl QueryInput for CategoryQuery {
    fn apply_filter(self, filter: &Filter) -> CoreResult<Self> {
        match filter {
            Filter::Search(term) => Ok(self.with_search(term.clone())),
            Filter::Status(status) => Ok(self.with_status(status.parse()?)),
            Filter::Category(_) => Err(unsupported("category", EntityKind::Categories)),
            Filter::Role(_) => Err(unsupported("role", EntityKind::Categories)),
        }
    }
}

impl QueryInput for UserQuery {
    fn apply_filter(self, filter: &Filter) -> CoreResult<Self> {
        match filter {
            Filter::Search(term) => Ok(self.with_search(term.clone())),
            Filter::Status(status) => Ok(self.with_status(status.parse()?)),
            Filter::Category(_) => Err(unsupported("category", EntityKind::Users)),
            Filter::Role(role) => {
                let role = role.as_deref().map(str::parse).transpose()?;
                Ok(self.with_role(role))
            }
        }
    }
}

/// Builds the session for one table from the configuration.
pub fn build_session<S: PageSource>(
    source: S,
    operations: BulkRegistry<IdOf<S>>,
    config: &Config,
    kind: EntityKind,
    notifier: Arc<dyn Notifier>,
) -> ListSession<S> {
    let controller = ListController::new(Arc::new(source), config.page_size(kind))
        .with_stale_policy(config.stale_policy());
    ListSession::new(controller, operations, notifier)
        .with_bulk_timeout(config.bulk_timeout())
        .with_noun(kind.name())
}

/// What the main loop should do after a line was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print the text (if any) and read the next line.
    Continue(String),
    Quit,
}

pub struct App<S: PageSource> {
    session: ListSession<S>,
    notifications: Arc<MemoryNotifier>,
}

impl<S> App<S>
where
    S: PageSource,
    S::Item: TableRow,
    S::Query: QueryInput,
    IdOf<S>: FromStr,
    <IdOf<S> as FromStr>::Err: fmt::Display,
{
    /// `notifications` must be the notifier the session was built with.
    pub fn new(session: ListSession<S>, notifications: Arc<MemoryNotifier>) -> Self {
        Self {
            session,
            notifications,
        }
    }

    pub fn session(&self) -> &ListSession<S> {
        &self.session
    }

    /// Loads the first page and returns the initial screen.
    pub async fn start(&mut self) -> String {
        match self.run(Command::Refetch).await {
            Flow::Continue(text) => text,
            Flow::Quit => String::new(),
        }
    }

    /// Handles one input line.
    pub async fn dispatch(&mut self, line: &str) -> Flow {
        let action = match parse_line::<S::Query, IdOf<S>>(line) {
            Ok(Some(action)) => action,
            Ok(None) => return Flow::Continue(String::new()),
            Err(message) => return Flow::Continue(message),
        };

        match action {
            InputAction::Quit => Flow::Quit,
            InputAction::Help => Flow::Continue(HELP.to_string()),
            InputAction::ListOperations(query) => {
                let found = self.session.operations().fuzzy_search(&query);
                Flow::Continue(render_operations(&found))
            }
            InputAction::Filter(filter) => {
                let query = self.session.controller().query().clone();
                match query.apply_filter(&filter) {
                    Ok(query) => self.run(Command::SetQuery(query)).await,
                    Err(e) => Flow::Continue(format!("error: {e}")),
                }
            }
            InputAction::Command(command) => self.run(command).await,
        }
    }

    async fn run(&mut self, command: Command<S::Query, IdOf<S>>) -> Flow {
        let events = match self.session.handle(command).await {
            Ok(events) => events,
            Err(e) => return Flow::Continue(format!("error: {e}")),
        };

        let mut lines = Vec::new();
        let redraw = events.iter().any(|event| {
            matches!(
                event,
                Event::PageLoaded { .. } | Event::SelectionChanged { .. } | Event::FetchFailed { .. }
            )
        });
        if redraw {
            lines.push(self.view());
        }
        lines.extend(events.iter().filter_map(render_event));
        for (level, message) in self.notifications.drain() {
            TracingNotifier.notify(level, &message);
            lines.push(format!("{level}: {message}"));
        }
        Flow::Continue(lines.join("\n"))
    }

    /// Current table, page bar and selection summary.
    pub fn view(&self) -> String {
        let controller = self.session.controller();
        let selection = self.session.selection();
        let rows = controller.visible_items();

        let mut out = format!(
            "{} | page {}/{} | {} selected\n",
            self.session.noun(),
            controller.current_page(),
            controller.total_pages(),
            selection.len()
        );
        if controller.is_loading() {
            out.push_str("loading...\n");
        }
        out.push_str(&render_table(&rows, selection.state(), |row| {
            selection.contains(&row.id())
        }));
        out.push_str(&render_page_bar(controller.pagination()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pixelforge_core::{
        BulkAction, BulkOperation, ItemOutcome, PageRequest, PageResult, Product, ProductStatus,
        UserRole,
    };

    struct StaticProducts(Vec<Product>);

    #[async_trait]
    impl PageSource for StaticProducts {
        type Item = Product;
        type Query = ProductQuery;

        async fn fetch_page(&self, request: PageRequest) -> CoreResult<PageResult<Product>> {
            let items = self
                .0
                .iter()
                .skip(request.skip as usize)
                .take(request.limit as usize)
                .cloned()
                .collect();
            Ok(PageResult::new(items, self.0.len() as u64))
        }
    }

    struct Accept;

    #[async_trait]
    impl BulkAction<u64> for Accept {
        async fn run(&self, ids: &[u64]) -> CoreResult<Vec<ItemOutcome<u64>>> {
            Ok(ids.iter().map(|id| ItemOutcome::ok(*id)).collect())
        }
    }

    fn product(id: u64, title: &str, locked: bool) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": title, "price": 5.0, "category_id": 1,
            "category_name": "Magnets", "is_locked": locked
        }))
        .unwrap()
    }

    fn app() -> App<StaticProducts> {
        let products = (1..=15)
            .map(|i| product(i, &format!("Magnet {i}"), i % 5 == 0))
            .collect();
        let operations = BulkRegistry::new().with(
            BulkOperation::new("delete", "Delete Products", Arc::new(Accept))
                .with_confirmation("This action cannot be undone.")
                .destructive(),
        );
        let notifications = Arc::new(MemoryNotifier::new());
        let session = build_session(
            StaticProducts(products),
            operations,
            &Config::default(),
            EntityKind::Products,
            notifications.clone(),
        );
        App::new(session, notifications)
    }

    fn text(flow: Flow) -> String {
        match flow {
            Flow::Continue(text) => text,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn start_shows_first_page() {
        let mut app = app();
        let screen = app.start().await;
        assert!(screen.starts_with("products | page 1/2 | 0 selected"));
        assert!(screen.contains("Magnet 12"));
        assert!(!screen.contains("Magnet 13"));
        assert!(screen.ends_with("1-12 of 15"));
    }

    #[tokio::test]
    async fn status_filter_updates_query() {
        let mut app = app();
        app.start().await;
        text(app.dispatch("status locked").await);

        let query = app.session().controller().query();
        assert_eq!(query.status, ProductStatus::Locked);
        let ids: Vec<u64> = app
            .session()
            .controller()
            .visible_items()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![5, 10]);
    }

    #[tokio::test]
    async fn invalid_filters_are_reported() {
        let mut app = app();
        app.start().await;
        assert!(text(app.dispatch("status archived").await).starts_with("error: invalid filter"));
        assert!(text(app.dispatch("role admin").await).contains("cannot be filtered by role"));
    }

    #[tokio::test]
    async fn out_of_range_page_is_explained() {
        let mut app = app();
        app.start().await;
        assert_eq!(text(app.dispatch("page 7").await), "page 7 does not exist");
    }

    #[tokio::test]
    async fn confirmed_delete_reports_success() {
        let mut app = app();
        app.start().await;
        text(app.dispatch("toggle 3").await);
        text(app.dispatch("toggle 4").await);

        let prompt = text(app.dispatch("run delete").await);
        assert!(prompt.contains("This action cannot be undone.\nSelected items: 2"));

        let done = text(app.dispatch("yes").await);
        assert!(done.contains("Delete Products: 2 of 2 succeeded"));
        assert!(done.contains("success: Successfully delete products 2 products"));
        assert!(app.session().selection().is_empty());
    }

    #[tokio::test]
    async fn run_without_selection_is_an_error() {
        let mut app = app();
        app.start().await;
        assert_eq!(
            text(app.dispatch("run delete").await),
            "error: no items selected"
        );
    }

    #[tokio::test]
    async fn ops_lists_registry() {
        let mut app = app();
        let listing = text(app.dispatch("ops").await);
        assert!(listing.contains("delete"));
        assert!(listing.contains("(destructive)"));
    }

    #[tokio::test]
    async fn quit_and_help() {
        let mut app = app();
        assert_eq!(app.dispatch("quit").await, Flow::Quit);
        assert!(text(app.dispatch("help").await).contains("run <op>"));
    }

    #[test]
    fn user_role_filter() {
        let query = UserQuery::default()
            .apply_filter(&Filter::Role(Some("admin".to_string())))
            .unwrap();
        assert_eq!(query.role, Some(UserRole::Admin));
        let cleared = query.apply_filter(&Filter::Role(None)).unwrap();
        assert_eq!(cleared.role, None);
    }

    #[test]
    fn category_query_rejects_category_filter() {
        let err = CategoryQuery::default()
            .apply_filter(&Filter::Category(Some("x".to_string())))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidFilter(_)));
    }
}
