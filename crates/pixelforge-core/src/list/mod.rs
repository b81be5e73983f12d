//! Paginated list infrastructure shared by every admin table.

pub mod bulk;
pub mod controller;
pub mod item;
pub mod pagination;
pub mod refine;
pub mod selection;
pub mod session;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use bulk::{
    BulkAction, BulkExecutor, BulkOperation, BulkOutcome, BulkRegistry, BulkReport, BulkState,
    BulkStep, ItemOutcome,
};
pub use controller::{ApplyOutcome, FetchState, FetchTicket, ListController, StalePolicy};
pub use item::{ListItem, ListQuery};
pub use pagination::{PageMarker, PageWindow, PaginationState};
pub use selection::{Selection, SelectionState};
pub use session::ListSession;
pub use source::{PageRequest, PageResult, PageSource};
