//! Column visibility state

use super::column::ColumnId;

/// Ordered map of column id to visibility flag
///
/// Invariant: once any column is visible, at least one stays visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibilityState {
    entries: Vec<(ColumnId, bool)>,
}

impl VisibilityState {
    /// All columns start visible
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnId>,
    {
        Self {
            entries: ids.into_iter().map(|id| (id.into(), true)).collect(),
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.entries
            .iter()
            .any(|(entry_id, visible)| entry_id == id && *visible)
    }

    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|(_, visible)| *visible).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is visible (including the empty schema)
    pub fn all_hidden(&self) -> bool {
        self.entries.iter().all(|(_, visible)| !*visible)
    }

    /// Flip a column's visibility
    ///
    /// Returns `false` without changing anything when the column is unknown or
    /// when hiding it would leave no visible column.
    pub fn toggle(&mut self, id: &str) -> bool {
        let visible_count = self.visible_count();
        let Some(entry) = self.entries.iter_mut().find(|(entry_id, _)| entry_id == id) else {
            return false;
        };
        if entry.1 && visible_count == 1 {
            return false;
        }
        entry.1 = !entry.1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_visible_initially() {
        let state = VisibilityState::new(["floor", "status"]);
        assert_eq!(state.visible_count(), 2);
        assert!(state.is_visible("floor"));
        assert!(!state.all_hidden());
    }

    #[test]
    fn test_last_visible_column_cannot_be_hidden() {
        let mut state = VisibilityState::new(["a", "b", "c"]);
        assert!(state.toggle("b"));
        assert!(state.toggle("a"));
        let before = state.clone();
        assert!(!state.toggle("c"));
        assert_eq!(state, before);
        assert_eq!(state.visible_count(), 1);
        assert!(state.is_visible("c"));
    }

    #[test]
    fn test_hidden_column_can_be_shown_again() {
        let mut state = VisibilityState::new(["a", "b"]);
        assert!(state.toggle("a"));
        assert!(!state.is_visible("a"));
        assert!(state.toggle("a"));
        assert!(state.is_visible("a"));
    }

    #[test]
    fn test_unknown_column_is_ignored() {
        let mut state = VisibilityState::new(["a"]);
        assert!(!state.toggle("zzz"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_empty_schema_counts_as_all_hidden() {
        let state = VisibilityState::new(Vec::<String>::new());
        assert!(state.all_hidden());
    }
}
