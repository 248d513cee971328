//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `TableModel` - Headless data table (search, sort, visibility, selection)
//! - `DomainState` - Business data (issues, signed-in user)
//! - `ModalStack` - Modal overlay management

pub mod dashboard;
pub mod dates;
pub mod domain;
pub mod issue;
pub mod modal;
pub mod table;
pub mod ui;

// Re-export commonly used types
pub use dashboard::{DateRange, IssueFilter, StatusCounts};
pub use domain::DomainState;
pub use issue::{floor_options, Issue, IssueStatus, NewIssue};
pub use ui::{AppMode, Toast, ToastLevel};
