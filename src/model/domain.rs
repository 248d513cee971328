//! Domain state - business/data state separate from UI concerns

use super::issue::Issue;
use crate::services::identity::User;

/// Domain state containing all business data
#[derive(Debug, Default)]
pub struct DomainState {
    /// Every issue from the last successful load, unfiltered
    pub issues: Vec<Issue>,

    /// Signed-in user, if any
    pub user: Option<User>,

    /// Issue shown in the detail sheet
    pub selected_issue: Option<Issue>,

    /// An issue load is in flight
    pub loading: bool,
}

impl DomainState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reporter name recorded on new issues
    pub fn reporter(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.email.as_str())
    }
}
