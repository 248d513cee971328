//! Modal stack for managing overlays
//!
//! Dialogs and sheets are pushed onto a stack; only the top one receives
//! input.

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
    /// Show/hide table columns
    ColumnPicker { selected_index: usize },
    /// New issue form
    CreateIssue,
    /// Side sheet with the selected issue's details
    IssueDetail { scroll_offset: usize },
    /// Floor filter picker
    FloorFilter { selected_index: usize },
    /// Status filter picker
    StatusFilter { selected_index: usize },
    /// Date range entry
    DateRange,
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drop every overlay (sign-out, mode change)
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::IssueDetail { scroll_offset: 0 });
        stack.push(Modal::QuitConfirm);

        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert_eq!(stack.pop(), Some(Modal::IssueDetail { scroll_offset: 0 }));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::FloorFilter { selected_index: 0 });

        if let Some(Modal::FloorFilter { selected_index }) = stack.top_mut() {
            *selected_index = 4;
        }

        assert_eq!(stack.top(), Some(&Modal::FloorFilter { selected_index: 4 }));
    }

    #[test]
    fn test_clear_and_iter_order() {
        let mut stack = ModalStack::new();
        stack.push(Modal::CreateIssue);
        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.stack, vec![Modal::CreateIssue, Modal::QuitConfirm]);
        stack.clear();
        assert!(stack.top().is_none());
    }
}
