//! Event system for communication between UI and Core.
//!
//! The UI translates user input into [`Command`]s, which a
//! [`ListSession`](crate::list::session::ListSession) processes and answers
//! with [`Event`]s. This decoupling allows any frontend to drive the same
//! table logic.

use crate::list::bulk::BulkReport;
use crate::list::selection::SelectionState;

/// An action the UI requests a table session to perform.
///
/// Commands flow **UI → Core**. The core never creates commands itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<Q, Id> {
    /// Replace the search/filter query. Resets to page 1 and fetches.
    SetQuery(Q),
    /// Jump to a 1-based page. Out-of-range pages are ignored.
    GoToPage(u32),
    NextPage,
    PrevPage,
    /// Re-fetch the current page.
    Refetch,
    /// Flip the selection of one row.
    Toggle(Id),
    /// Select every visible row.
    SelectAll,
    /// Header checkbox: all rows selected → none, otherwise → all.
    ToggleAll,
    ClearSelection,
    /// Start the bulk operation with the given id over the selection.
    RunBulk(String),
    /// Affirm a pending confirmation.
    Confirm,
    /// Abandon a pending confirmation.
    Cancel,
}

/// A notification a table session sends back to the UI.
///
/// Events flow **Core → UI**. The UI uses these to update its display state.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<Id> {
    /// A page was fetched and applied.
    PageLoaded {
        page: u32,
        total_pages: u32,
        /// Rows left after client-side refinement.
        visible: usize,
        /// Server-side total before refinement.
        total: u64,
    },
    /// A fetch failed; the message is suitable for display.
    FetchFailed { error: String },
    /// A page change was ignored because the page does not exist.
    PageIgnored { requested: u32 },
    SelectionChanged {
        state: SelectionState,
        selected: usize,
    },
    /// The operation needs an explicit yes/no before it runs.
    ConfirmationRequired {
        operation_id: String,
        prompt: String,
    },
    BulkCancelled,
    /// Every selected item succeeded.
    BulkCompleted(BulkReport<Id>),
    /// Some items failed; those stay selected.
    BulkPartial(BulkReport<Id>),
    /// The operation failed as a whole; the selection is unchanged.
    BulkFailed {
        operation_id: String,
        reason: String,
    },
}
