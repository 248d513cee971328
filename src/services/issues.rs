//! Issue documents and the background issue loader

use super::store::{Document, DocumentStore, Fields, StoreError};
use crate::model::issue::{Issue, IssueStatus, Note};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

/// Stored shape of an issue
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueDocument {
    #[serde(default)]
    floor: String,
    #[serde(default)]
    equipment: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    first_reported: Option<DateTime<Utc>>,
    #[serde(default)]
    reported_by: Option<String>,
    status: IssueStatus,
    #[serde(default)]
    expected_resolution_date: Option<DateTime<Utc>>,
    #[serde(default)]
    date_resolved: Option<DateTime<Utc>>,
    #[serde(default)]
    notes: Option<Vec<NoteDocument>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteDocument {
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    updated_by: String,
}

/// Map a stored document to an issue
///
/// Missing or empty `reportedBy` becomes "unknown"; missing notes become an
/// empty list. An unknown status is an error.
pub fn issue_from_document(doc: &Document) -> Result<Issue, serde_json::Error> {
    let stored: IssueDocument = serde_json::from_value(Value::Object(doc.fields.clone()))?;
    Ok(Issue {
        id: doc.id.clone(),
        floor: stored.floor,
        equipment: stored.equipment,
        description: stored.description,
        first_reported: stored.first_reported,
        reported_by: stored
            .reported_by
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "unknown".to_string()),
        status: stored.status,
        expected_resolution_date: stored.expected_resolution_date,
        date_resolved: stored.date_resolved,
        notes: stored
            .notes
            .unwrap_or_default()
            .into_iter()
            .map(|n| Note {
                timestamp: n.timestamp,
                comment: n.comment,
                updated_by: n.updated_by,
            })
            .collect(),
    })
}

/// Fields written for a new issue (the id is assigned by the store)
pub fn issue_to_fields(issue: &Issue) -> Result<Fields, serde_json::Error> {
    let stored = IssueDocument {
        floor: issue.floor.clone(),
        equipment: issue.equipment.clone(),
        description: issue.description.clone(),
        first_reported: issue.first_reported,
        reported_by: Some(issue.reported_by.clone()),
        status: issue.status,
        expected_resolution_date: issue.expected_resolution_date,
        date_resolved: issue.date_resolved,
        notes: Some(
            issue
                .notes
                .iter()
                .map(|n| NoteDocument {
                    timestamp: n.timestamp,
                    comment: n.comment.clone(),
                    updated_by: n.updated_by.clone(),
                })
                .collect(),
        ),
    };
    match serde_json::to_value(stored)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom("issue did not encode as an object")),
    }
}

/// Read every issue in a collection, skipping documents that do not map
pub fn load_issues(store: &dyn DocumentStore, collection: &str) -> Result<Vec<Issue>, StoreError> {
    let documents = store.list(collection)?;
    let issues = documents
        .iter()
        .filter_map(|doc| match issue_from_document(doc) {
            Ok(issue) => Some(issue),
            Err(e) => {
                warn!(id = %doc.id, error = %e, "skipping malformed issue document");
                None
            }
        })
        .collect();
    Ok(issues)
}

/// Append an issue and return the stored copy with its id
pub fn add_issue(store: &dyn DocumentStore, collection: &str, issue: Issue) -> Result<Issue, StoreError> {
    let fields = issue_to_fields(&issue)?;
    let id = store.add(collection, fields)?;
    Ok(Issue { id, ..issue })
}

/// Outcome of a background load
pub type LoadResult = Result<Vec<Issue>, String>;

struct LoadJob {
    receiver: Receiver<LoadResult>,
    start_instant: Instant,
}

/// Fetches issues on a worker thread; results are picked up by `poll`
#[derive(Default)]
pub struct IssueLoader {
    job: Option<LoadJob>,
}

impl IssueLoader {
    pub fn new() -> Self {
        Self { job: None }
    }

    pub fn is_loading(&self) -> bool {
        self.job.is_some()
    }

    /// Start a load, replacing any load still in flight
    pub fn spawn(&mut self, store: Arc<dyn DocumentStore>, collection: String) {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_issues(store.as_ref(), &collection).map_err(|e| e.to_string());
            // The receiver is gone if the load was cancelled
            let _ = tx.send(result);
        });

        self.job = Some(LoadJob {
            receiver: rx,
            start_instant: Instant::now(),
        });
    }

    /// Non-blocking check for a finished load
    pub fn poll(&mut self) -> Option<LoadResult> {
        let job = self.job.as_ref()?;
        let result = match job.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err("issue loader stopped unexpectedly".to_string()),
        };

        if let Ok(issues) = &result {
            info!(
                count = issues.len(),
                elapsed_ms = job.start_instant.elapsed().as_millis() as u64,
                "issues loaded"
            );
        }
        self.job = None;
        Some(result)
    }

    /// Drop the in-flight load; its result is discarded
    pub fn clear(&mut self) {
        self.job = None;
    }
}
