//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::{DateRange, IssueStatus, NewIssue};
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations/updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Transition from splash to login or dashboard
    SplashComplete,

    // ─────────────────────────────────────────────────────────────────────────
    // Table Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move the row cursor down
    NextRow,
    /// Move the row cursor up
    PrevRow,
    /// Jump to the first row
    FirstRow,
    /// Jump to the last row
    LastRow,
    /// Focus the next visible column
    NextColumn,
    /// Focus the previous visible column
    PrevColumn,

    // ─────────────────────────────────────────────────────────────────────────
    // Table Sorting / Columns
    // ─────────────────────────────────────────────────────────────────────────
    /// Cycle sort on the focused column
    CycleSort,
    /// Cycle sort on a specific column (header click)
    CycleSortColumn(String),
    /// Show or hide a column
    ToggleColumn(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────
    /// Activate the row under the cursor
    ActivateRow,
    /// Activate the row at a display position (mouse)
    ClickRow(usize),
    /// Clear the table selection
    Deselect,
    /// A row was selected; carries the issue id
    IssueSelected(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    /// Enter search mode
    EnterSearchMode,
    /// Exit search mode, keeping the query
    ExitSearchMode,
    /// Empty the search query
    ClearSearch,
    /// Add character to search query
    SearchInput(char),
    /// Remove last character from search query
    SearchBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll a sheet or dialog up one line
    ScrollUp,
    /// Scroll a sheet or dialog down one line
    ScrollDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open the column visibility picker
    OpenColumnPicker,
    /// Open the new issue form
    OpenCreateIssue,
    /// Open the detail sheet for the selected issue
    OpenIssueDetail,
    /// Open the floor filter picker
    OpenFloorFilter,
    /// Open the status filter picker
    OpenStatusFilter,
    /// Open the date range dialog
    OpenDateRange,
    /// Close the current modal
    CloseModal,
    /// Navigate up in modal (e.g., previous option)
    ModalUp,
    /// Navigate down in modal (e.g., next option)
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Dashboard Filters
    // ─────────────────────────────────────────────────────────────────────────
    /// Set the floor filter (`None` shows all floors)
    SetFloorFilter(Option<String>),
    /// Set the status filter (`None` shows all statuses)
    SetStatusFilter(Option<IssueStatus>),
    /// Set the first-reported date range
    SetDateRange(Option<DateRange>),
    /// Flip newest/oldest ordering
    ToggleSortOrder,
    /// Reset every dashboard filter
    ClearFilters,

    // ─────────────────────────────────────────────────────────────────────────
    // Issues
    // ─────────────────────────────────────────────────────────────────────────
    /// Reload issues from the store
    RefreshIssues,
    /// Append a new issue to the store
    SubmitIssue(NewIssue),

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Attempt to sign in
    SignIn { email: String, password: String },
    /// Sign out and return to the login screen
    SignOut,
    /// Flip between dark and light themes
    ToggleTheme,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::SplashComplete => write!(f, "SplashComplete"),
            Action::NextRow => write!(f, "NextRow"),
            Action::PrevRow => write!(f, "PrevRow"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::NextColumn => write!(f, "NextColumn"),
            Action::PrevColumn => write!(f, "PrevColumn"),
            Action::CycleSort => write!(f, "CycleSort"),
            Action::CycleSortColumn(id) => write!(f, "CycleSortColumn({})", id),
            Action::ToggleColumn(id) => write!(f, "ToggleColumn({})", id),
            Action::ActivateRow => write!(f, "ActivateRow"),
            Action::ClickRow(pos) => write!(f, "ClickRow({})", pos),
            Action::Deselect => write!(f, "Deselect"),
            Action::IssueSelected(id) => write!(f, "IssueSelected({})", id),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::ClearSearch => write!(f, "ClearSearch"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenColumnPicker => write!(f, "OpenColumnPicker"),
            Action::OpenCreateIssue => write!(f, "OpenCreateIssue"),
            Action::OpenIssueDetail => write!(f, "OpenIssueDetail"),
            Action::OpenFloorFilter => write!(f, "OpenFloorFilter"),
            Action::OpenStatusFilter => write!(f, "OpenStatusFilter"),
            Action::OpenDateRange => write!(f, "OpenDateRange"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::SetFloorFilter(floor) => {
                write!(f, "SetFloorFilter({})", floor.as_deref().unwrap_or("All"))
            }
            Action::SetStatusFilter(status) => match status {
                Some(status) => write!(f, "SetStatusFilter({})", status),
                None => write!(f, "SetStatusFilter(All)"),
            },
            Action::SetDateRange(range) => match range {
                Some(range) => write!(f, "SetDateRange({})", range.label()),
                None => write!(f, "SetDateRange(None)"),
            },
            Action::ToggleSortOrder => write!(f, "ToggleSortOrder"),
            Action::ClearFilters => write!(f, "ClearFilters"),
            Action::RefreshIssues => write!(f, "RefreshIssues"),
            Action::SubmitIssue(issue) => {
                write!(f, "SubmitIssue({} / {})", issue.floor, issue.equipment)
            }
            // Never log the password
            Action::SignIn { email, .. } => write!(f, "SignIn({})", email),
            Action::SignOut => write!(f, "SignOut"),
            Action::ToggleTheme => write!(f, "ToggleTheme"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_in_display_hides_password() {
        let action = Action::SignIn {
            email: "ops@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let shown = action.to_string();
        assert!(shown.contains("ops@example.com"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_filter_display() {
        assert_eq!(Action::SetFloorFilter(None).to_string(), "SetFloorFilter(All)");
        assert_eq!(
            Action::SetStatusFilter(Some(IssueStatus::InProgress)).to_string(),
            "SetStatusFilter(In Progress)"
        );
    }
}
