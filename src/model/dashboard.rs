//! Dashboard-level filtering and summary counts
//!
//! These filters run before the table sees the data; the table's own search
//! and sort apply on top.

use super::issue::{Issue, IssueStatus};
use chrono::{DateTime, Local, NaiveDate, Utc};

/// Ordering of issues by first-reported date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn toggled(self) -> SortOrder {
        match self {
            SortOrder::Newest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Newest,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SortOrder::Newest => "Newest First",
            SortOrder::Oldest => "Oldest First",
        }
    }
}

/// Inclusive calendar-day range; an open `to` means "from onwards"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && self.to.map_or(true, |to| date <= to)
    }

    pub fn label(&self) -> String {
        match self.to {
            Some(to) => format!(
                "{} - {}",
                self.from.format("%b %d, %Y"),
                to.format("%b %d, %Y")
            ),
            None => format!("{} -", self.from.format("%b %d, %Y")),
        }
    }
}

/// Floor / status / date filters plus date ordering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    /// `None` means all floors
    pub floor: Option<String>,
    /// `None` means all statuses
    pub status: Option<IssueStatus>,
    pub date_range: Option<DateRange>,
    pub sort_order: SortOrder,
}

impl IssueFilter {
    pub fn is_active(&self) -> bool {
        self.floor.is_some() || self.status.is_some() || self.date_range.is_some()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        let floor_match = self.floor.as_ref().map_or(true, |floor| &issue.floor == floor);
        let status_match = self.status.map_or(true, |status| issue.status == status);
        let date_match = match (self.date_range, issue.first_reported) {
            (Some(range), Some(reported)) => range.contains(local_date(reported)),
            // Undated issues are never hidden by a date filter
            _ => true,
        };
        floor_match && status_match && date_match
    }

    /// Filter and order issues for the table
    pub fn apply(&self, issues: &[Issue]) -> Vec<Issue> {
        let mut filtered: Vec<Issue> = issues.iter().filter(|i| self.matches(i)).cloned().collect();
        let millis = |issue: &Issue| issue.first_reported.map(|d| d.timestamp_millis()).unwrap_or(0);
        match self.sort_order {
            SortOrder::Newest => filtered.sort_by(|a, b| millis(b).cmp(&millis(a))),
            SortOrder::Oldest => filtered.sort_by(|a, b| millis(a).cmp(&millis(b))),
        }
        filtered
    }
}

fn local_date(dt: DateTime<Utc>) -> NaiveDate {
    dt.with_timezone(&Local).date_naive()
}

/// Issue totals per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
}

impl StatusCounts {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let count = |status: IssueStatus| issues.iter().filter(|i| i.status == status).count();
        Self {
            total: issues.len(),
            open: count(IssueStatus::Open),
            in_progress: count(IssueStatus::InProgress),
            resolved: count(IssueStatus::Resolved),
        }
    }
}
