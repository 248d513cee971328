//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod column_picker;
pub mod create_issue_dialog;
pub mod dashboard;
pub mod data_table;
pub mod date_range_dialog;
pub mod help_dialog;
pub mod issue_columns;
pub mod issue_detail;
pub mod layout;
pub mod login;
pub mod quit_dialog;
pub mod select_dialog;
pub mod splash;
pub mod text_input;

pub use column_picker::ColumnPicker;
pub use create_issue_dialog::CreateIssueDialog;
pub use dashboard::DashboardComponent;
pub use date_range_dialog::DateRangeDialog;
pub use help_dialog::HelpDialog;
pub use issue_detail::IssueDetailSheet;
pub use layout::centered_popup;
pub use login::LoginComponent;
pub use quit_dialog::QuitDialog;
pub use select_dialog::{SelectDialog, SelectKind};
pub use splash::SplashComponent;
