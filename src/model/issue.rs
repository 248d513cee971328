//! Facilities issue model

use super::dates::ordinal_suffix;
use super::table::{CellValue, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle status of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub fn all() -> Vec<IssueStatus> {
        vec![IssueStatus::Open, IssueStatus::InProgress, IssueStatus::Resolved]
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Resolved => "Resolved",
        }
    }

    pub fn from_label(label: &str) -> Option<IssueStatus> {
        IssueStatus::all().into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A timestamped comment on an issue
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub timestamp: Option<DateTime<Utc>>,
    pub comment: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Document id assigned by the store
    pub id: String,
    pub floor: String,
    pub equipment: String,
    pub description: String,
    pub first_reported: Option<DateTime<Utc>>,
    pub reported_by: String,
    pub status: IssueStatus,
    pub expected_resolution_date: Option<DateTime<Utc>>,
    pub date_resolved: Option<DateTime<Utc>>,
    pub notes: Vec<Note>,
}

impl Record for Issue {
    fn values(&self) -> Vec<CellValue> {
        let notes = self
            .notes
            .iter()
            .map(|n| n.comment.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        vec![
            CellValue::from(self.id.as_str()),
            CellValue::from(self.floor.as_str()),
            CellValue::from(self.equipment.as_str()),
            CellValue::from(self.description.as_str()),
            CellValue::from(self.first_reported),
            CellValue::from(self.reported_by.as_str()),
            CellValue::from(self.status.label()),
            CellValue::from(self.expected_resolution_date),
            CellValue::from(self.date_resolved),
            CellValue::from(notes),
        ]
    }
}

/// Floors an issue can be logged against, in building order
pub fn floor_options() -> Vec<String> {
    let mut floors = vec!["Ground Floor".to_string()];
    floors.extend((1..=11).map(|n| format!("{}{} Floor", n, ordinal_suffix(n))));
    floors.push("Roof".to_string());
    floors
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssueError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Draft of a new issue from the create form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIssue {
    pub floor: String,
    pub equipment: String,
    pub description: String,
    /// Optional initial note
    pub note: String,
}

impl NewIssue {
    pub fn validate(&self) -> Result<(), IssueError> {
        if self.floor.trim().is_empty() {
            return Err(IssueError::MissingField("floor"));
        }
        if self.equipment.trim().is_empty() {
            return Err(IssueError::MissingField("equipment"));
        }
        if self.description.trim().is_empty() {
            return Err(IssueError::MissingField("description"));
        }
        Ok(())
    }

    /// Build the issue as first reported by `reporter` at `now`
    ///
    /// The id is left empty; the store assigns one.
    pub fn into_issue(self, reporter: Option<&str>, now: DateTime<Utc>) -> Result<Issue, IssueError> {
        self.validate()?;
        let reporter = reporter.unwrap_or("unknown").to_string();
        let notes = if self.note.trim().is_empty() {
            Vec::new()
        } else {
            vec![Note {
                timestamp: Some(now),
                comment: self.note.trim().to_string(),
                updated_by: reporter.clone(),
            }]
        };

        Ok(Issue {
            id: String::new(),
            floor: self.floor,
            equipment: self.equipment.trim().to_string(),
            description: self.description.trim().to_string(),
            first_reported: Some(now),
            reported_by: reporter,
            status: IssueStatus::Open,
            expected_resolution_date: None,
            date_resolved: None,
            notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewIssue {
        NewIssue {
            floor: "3rd Floor".to_string(),
            equipment: "Chiller".to_string(),
            description: "Leaking".to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn test_floor_options() {
        let floors = floor_options();
        assert_eq!(floors.len(), 13);
        assert_eq!(floors[0], "Ground Floor");
        assert_eq!(floors[1], "1st Floor");
        assert_eq!(floors[2], "2nd Floor");
        assert_eq!(floors[3], "3rd Floor");
        assert_eq!(floors[11], "11th Floor");
        assert_eq!(floors[12], "Roof");
    }

    #[test]
    fn test_status_labels_round_trip() {
        for status in IssueStatus::all() {
            assert_eq!(IssueStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(IssueStatus::from_label("Closed"), None);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let mut d = draft();
        d.equipment = "  ".to_string();
        assert_eq!(d.validate(), Err(IssueError::MissingField("equipment")));
        let mut d = draft();
        d.floor.clear();
        assert_eq!(d.validate(), Err(IssueError::MissingField("floor")));
    }

    #[test]
    fn test_into_issue_defaults() {
        let now = Utc::now();
        let issue = draft().into_issue(None, now).unwrap();
        assert_eq!(issue.status, IssueStatus::Open);
        assert_eq!(issue.reported_by, "unknown");
        assert_eq!(issue.first_reported, Some(now));
        assert!(issue.notes.is_empty());
        assert!(issue.expected_resolution_date.is_none());
    }

    #[test]
    fn test_initial_note_is_stamped() {
        let now = Utc::now();
        let mut d = draft();
        d.note = "Reported by security".to_string();
        let issue = d.into_issue(Some("tech@example.com"), now).unwrap();
        assert_eq!(issue.notes.len(), 1);
        assert_eq!(issue.notes[0].updated_by, "tech@example.com");
        assert_eq!(issue.notes[0].timestamp, Some(now));
    }

    #[test]
    fn test_record_values_include_status_label() {
        let issue = draft().into_issue(None, Utc::now()).unwrap();
        let values = issue.values();
        assert!(values.contains(&CellValue::from("Open")));
        assert!(values.contains(&CellValue::from("Chiller")));
    }
}
