//! Multi-row selection scoped to one table.
//!
//! The selection is always a subset of the currently visible ids: replacing
//! the visible set drops selections that are no longer shown, and toggles
//! for ids that are not visible are ignored.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

/// Tri-state indicator for the "select all" checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    None,
    Partial,
    All,
}

/// Immutable selection set over the visible rows.
///
/// Every mutation consumes `self` and returns the new selection.
#[derive(Debug, Clone)]
pub struct Selection<Id> {
    visible: Vec<Id>,
    selected: BTreeSet<Id>,
}

impl<Id> Default for Selection<Id> {
    fn default() -> Self {
        Self {
            visible: Vec::new(),
            selected: BTreeSet::new(),
        }
    }
}

impl<Id> Selection<Id>
where
    Id: Clone + Ord + fmt::Debug,
{
    /// Creates an empty selection with nothing visible.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty selection over `visible`. Repeated ids are kept once.
    pub fn over(visible: Vec<Id>) -> Self {
        Self {
            visible: unique(visible),
            selected: BTreeSet::new(),
        }
    }

    /// Replaces the visible ids, dropping selected ids that are no longer visible.
    ///
    /// Repeated ids are kept once, at their first position.
    pub fn with_visible(self, visible: Vec<Id>) -> Self {
        let visible = unique(visible);
        let shown: BTreeSet<&Id> = visible.iter().collect();
        let selected = self
            .selected
            .into_iter()
            .filter(|id| shown.contains(id))
            .collect();
        Self { visible, selected }
    }

    /// Flips `id`. Ids that are not visible are ignored.
    pub fn toggle(self, id: &Id) -> Self {
        let is_selected = self.selected.contains(id);
        self.set(id, !is_selected)
    }

    /// Marks `id` as selected or not. Ids that are not visible are ignored.
    pub fn set(mut self, id: &Id, selected: bool) -> Self {
        if !self.visible.contains(id) {
            debug!(?id, "ignoring selection change for id that is not visible");
            return self;
        }
        if selected {
            self.selected.insert(id.clone());
        } else {
            self.selected.remove(id);
        }
        self
    }

    /// Selects exactly the visible ids.
    ///
    /// This is the current page (after refinement), not the whole server-side
    /// collection.
    pub fn select_all(self) -> Self {
        let selected = self.visible.iter().cloned().collect();
        Self { selected, ..self }
    }

    /// Header checkbox behaviour: deselects everything when all rows are
    /// selected, otherwise selects all visible rows.
    pub fn toggle_all(self) -> Self {
        match self.state() {
            SelectionState::All => self.clear(),
            _ => self.select_all(),
        }
    }

    /// Deselects everything. Idempotent.
    pub fn clear(self) -> Self {
        Self {
            selected: BTreeSet::new(),
            ..self
        }
    }

    /// Keeps only the selected ids that also appear in `ids`.
    pub fn retain_only(self, ids: &[Id]) -> Self {
        let keep: BTreeSet<&Id> = ids.iter().collect();
        let selected = self
            .selected
            .into_iter()
            .filter(|id| keep.contains(id))
            .collect();
        Self { selected, ..self }
    }

    pub fn state(&self) -> SelectionState {
        if self.selected.is_empty() {
            SelectionState::None
        } else if self.selected.len() == self.visible.len() {
            SelectionState::All
        } else {
            SelectionState::Partial
        }
    }

    /// Selected ids in display order.
    pub fn selected_ids(&self) -> Vec<Id> {
        self.visible
            .iter()
            .filter(|id| self.selected.contains(id))
            .cloned()
            .collect()
    }

    pub fn visible_ids(&self) -> &[Id] {
        &self.visible
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

fn unique<Id: Clone + Ord>(ids: Vec<Id>) -> Vec<Id> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(n: u64) -> Selection<u64> {
        Selection::over((1..=n).collect())
    }

    #[test]
    fn new_selection_is_none() {
        let sel = visible(3);
        assert_eq!(sel.state(), SelectionState::None);
        assert!(sel.is_empty());
    }

    #[test]
    fn select_all_then_state_is_all() {
        let sel = visible(4).select_all();
        assert_eq!(sel.state(), SelectionState::All);
        assert_eq!(sel.selected_ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn clear_then_state_is_none() {
        let sel = visible(4).select_all().clear();
        assert_eq!(sel.state(), SelectionState::None);
    }

    #[test]
    fn clear_twice_equals_clear_once() {
        let once = visible(4).select_all().clear();
        let twice = visible(4).select_all().clear().clear();
        assert_eq!(once.state(), twice.state());
        assert_eq!(once.selected_ids(), twice.selected_ids());
    }

    #[test]
    fn toggling_one_of_many_is_partial() {
        let sel = visible(5).toggle(&3);
        assert_eq!(sel.state(), SelectionState::Partial);
        assert!(sel.contains(&3));
    }

    #[test]
    fn toggling_only_row_is_all() {
        let sel = visible(1).toggle(&1);
        assert_eq!(sel.state(), SelectionState::All);
    }

    #[test]
    fn toggle_twice_deselects() {
        let sel = visible(3).toggle(&2).toggle(&2);
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_unknown_id_is_ignored() {
        let sel = visible(3).toggle(&42);
        assert!(sel.is_empty());
        assert!(!sel.contains(&42));
    }

    #[test]
    fn select_all_only_covers_visible_rows() {
        // Server has 40 rows but only 12 are on screen.
        let sel = visible(12).select_all();
        assert_eq!(sel.len(), 12);
        assert!(!sel.contains(&13));
    }

    #[test]
    fn with_visible_drops_rows_that_disappeared() {
        let sel = visible(4).select_all();
        let sel = sel.with_visible(vec![3, 4, 5]);
        assert_eq!(sel.selected_ids(), vec![3, 4]);
        assert_eq!(sel.state(), SelectionState::Partial);
    }

    #[test]
    fn with_visible_to_empty_clears() {
        let sel = visible(2).select_all().with_visible(Vec::new());
        assert_eq!(sel.state(), SelectionState::None);
    }

    #[test]
    fn toggle_all_flips_between_all_and_none() {
        let sel = visible(3).toggle(&1).toggle_all();
        assert_eq!(sel.state(), SelectionState::All);
        let sel = sel.toggle_all();
        assert_eq!(sel.state(), SelectionState::None);
    }

    #[test]
    fn retain_only_narrows_selection() {
        let sel = visible(5).select_all().retain_only(&[2, 4, 9]);
        assert_eq!(sel.selected_ids(), vec![2, 4]);
    }

    #[test]
    fn selected_ids_follow_display_order() {
        let sel = Selection::over(vec![30, 10, 20]).toggle(&20).toggle(&30);
        assert_eq!(sel.selected_ids(), vec![30, 20]);
    }

    #[test]
    fn string_ids_are_supported() {
        let sel = Selection::over(vec!["a1".to_string(), "b2".to_string()])
            .toggle(&"b2".to_string());
        assert_eq!(sel.selected_ids(), vec!["b2".to_string()]);
    }

    #[test]
    fn repeated_visible_ids_can_still_reach_all() {
        let sel = Selection::over(vec![1u64, 2, 2, 3]).select_all();
        assert_eq!(sel.visible_ids(), &[1, 2, 3]);
        assert_eq!(sel.state(), SelectionState::All);

        let sel = sel.with_visible(vec![3, 1, 3, 1]);
        assert_eq!(sel.visible_ids(), &[3, 1]);
        assert_eq!(sel.selected_ids(), vec![3, 1]);
        assert_eq!(sel.state(), SelectionState::All);
    }
}
