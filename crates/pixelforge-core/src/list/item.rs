//! Traits describing the rows a table shows and the query that narrows them.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

/// A row that can be listed, searched and selected.
///
/// Each entity picks a single `Id` representation and uses it end to end.
pub trait ListItem: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// Text fields the search term is matched against. Missing optional
    /// fields are simply left out.
    fn search_fields(&self) -> Vec<&str>;
}

/// The user-facing filter inputs of one table.
///
/// A query is split between the server (`server_filters`, sent with every
/// page request) and the client (`search_term` and `matches_status`,
/// applied to the fetched page in memory).
pub trait ListQuery<T>: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Free-text search term, if any.
    fn search_term(&self) -> Option<&str>;

    /// Key/value filters forwarded to the collection endpoint.
    fn server_filters(&self) -> BTreeMap<String, String>;

    /// Client-side status predicate. Never mutates the item.
    fn matches_status(&self, item: &T) -> bool;
}
