//! Single-row selection state machine

use super::RowId;

/// Outcome of activating a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The row became the selection (any previous selection dropped)
    Selected(RowId),
    /// The row was already selected and is now deselected
    Deselected(RowId),
    /// Selection is disabled
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    selected: Option<RowId>,
}

impl Selection {
    pub fn selected(&self) -> Option<RowId> {
        self.selected
    }

    pub fn toggle(&mut self, id: RowId) -> SelectionChange {
        if self.selected == Some(id) {
            self.selected = None;
            SelectionChange::Deselected(id)
        } else {
            self.selected = Some(id);
            SelectionChange::Selected(id)
        }
    }

    /// Drop the selection, returning whether anything was selected
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }
}
