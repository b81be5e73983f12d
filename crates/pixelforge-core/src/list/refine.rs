//! In-memory refinement of an already-fetched page.
//!
//! Refinement only ever sees the page the server returned. A search term
//! that matches a row on page 2 finds nothing while page 1 is loaded, and
//! the refined row count can be smaller than the page size.

use crate::list::item::{ListItem, ListQuery};
use crate::nfc_string;

/// Case- and normalisation-insensitive form used for substring matching.
fn fold(text: &str) -> String {
    nfc_string(text).to_lowercase()
}

/// Returns `true` if any search field of `item` contains `term`.
///
/// A blank term matches every item.
pub fn matches_search<T: ListItem>(item: &T, term: &str) -> bool {
    let needle = fold(term.trim());
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| fold(field).contains(&needle))
}

/// Filters `items` by `search_term` and `status`.
///
/// Returns a **new** `Vec`; the input slice is never mutated and the
/// original order is preserved.
pub fn refine<T, F>(items: &[T], search_term: Option<&str>, status: F) -> Vec<T>
where
    T: ListItem,
    F: Fn(&T) -> bool,
{
    let needle = search_term.map(fold).map(|t| t.trim().to_string());
    items
        .iter()
        .filter(|item| match needle.as_deref() {
            Some(term) if !term.is_empty() => item
                .search_fields()
                .iter()
                .any(|field| fold(field).contains(term)),
            _ => true,
        })
        .filter(|item| status(item))
        .cloned()
        .collect()
}

/// Applies the client-side half of `query` to `items`.
pub fn refine_with_query<T, Q>(items: &[T], query: &Q) -> Vec<T>
where
    T: ListItem,
    Q: ListQuery<T>,
{
    refine(items, query.search_term(), |item| query.matches_status(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::testing::{row, Row, RowQuery};

    fn sample() -> Vec<Row> {
        vec![
            row(1, "Photo Magnet", "Glossy square magnet"),
            row(2, "Fridge Magnet", "Classic"),
            row(3, "Retro Print", "Polaroid style print"),
        ]
    }

    #[test]
    fn empty_term_keeps_everything() {
        let items = sample();
        assert_eq!(refine(&items, None, |_| true).len(), 3);
        assert_eq!(refine(&items, Some("   "), |_| true).len(), 3);
    }

    #[test]
    fn search_is_case_insensitive() {
        let items = sample();
        let found = refine(&items, Some("MAGNET"), |_| true);
        let ids: Vec<u64> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn search_matches_any_field() {
        let items = sample();
        let found = refine(&items, Some("polaroid"), |_| true);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 3);
    }

    #[test]
    fn search_term_is_trimmed() {
        let items = sample();
        assert_eq!(refine(&items, Some("  retro "), |_| true).len(), 1);
    }

    #[test]
    fn status_predicate_filters_without_mutating() {
        let mut items = sample();
        items[1].flagged = true;
        let found = refine(&items, None, |r: &Row| r.flagged);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn decomposed_hangul_matches_composed_term() {
        let items = vec![row(7, "\u{1100}\u{1161}\u{11A8} print", "")];
        assert!(matches_search(&items[0], "\u{AC01}"));
    }

    #[test]
    fn refine_with_query_combines_search_and_status() {
        let mut items = sample();
        items[0].flagged = true;
        let query = RowQuery {
            search: Some("magnet".to_string()),
            flagged_only: true,
        };
        let found = refine_with_query(&items, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn search_does_not_reach_other_pages() {
        // Page 1 holds twelve rows, none of which mention "widget"; the
        // only widget lives on page 2 and is never fetched.
        let page_one: Vec<Row> = (1..=12)
            .map(|i| row(i, &format!("Magnet {i}"), "plain"))
            .collect();
        let page_two = [row(13, "Widget", "only on page two")];

        assert!(refine(&page_one, Some("widget"), |_| true).is_empty());
        assert_eq!(refine(&page_two, Some("widget"), |_| true).len(), 1);
    }
}
