//! PixelForge core library: UI-agnostic logic for the admin tables.
//!
//! `pixelforge-core` knows nothing about HTTP or terminals. Frontends
//! supply a [`PageSource`](list::PageSource) for each table, register
//! [`BulkOperation`](list::BulkOperation)s and drive a
//! [`ListSession`](list::ListSession) with [`Command`]s.
//!
//! # Modules
//!
//! - [`list`]: Pagination, fetch control, client-side refinement, selection and bulk operations.
//! - [`catalog`]: Product, category and user entities with their filters.
//! - [`config`]: TOML-based settings.
//! - [`notify`]: The user feedback capability injected into each table.
//! - [`event`]: Command and event types for UI ↔ Core communication.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod list;
pub mod notify;

pub use catalog::{
    Category, CategoryQuery, CategoryStatus, EntityKind, Product, ProductQuery, ProductStatus,
    User, UserQuery, UserRole, UserStatus,
};
pub use config::settings::Config;
pub use error::{CoreError, CoreResult};
pub use event::{Command, Event};
pub use list::{
    BulkAction, BulkOperation, BulkRegistry, BulkReport, ItemOutcome, ListController, ListItem,
    ListQuery, ListSession, PageRequest, PageResult, PageSource, PaginationState, Selection,
    SelectionState, StalePolicy,
};
pub use notify::{MemoryNotifier, Notifier, NotifyLevel, TracingNotifier};

/// Normalises a string to NFC (composed) form.
///
/// Search terms typed on one platform and data stored on another may use
/// different Unicode forms for the same text (e.g. Korean Hangul as
/// individual Jamo). This helper re-composes them.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
