//! Document store
//!
//! Collections of schemaless JSON documents keyed by a generated id. Reads
//! return a snapshot; writes append. `JsonFileStore` keeps every collection
//! in one JSON file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub type Fields = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed store file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// A stored document: id plus raw fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

pub trait DocumentStore: Send + Sync {
    /// Snapshot of every document in a collection; an unknown collection is empty
    fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Append a document and return its generated id
    fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;
}

type Collections = BTreeMap<String, Vec<Document>>;

pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Result<Collections, StoreError> {
        if !self.path.exists() {
            return Ok(Collections::new());
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Collections::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, collections: &Collections) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(io_err)?;
            }
        }
        let contents = serde_json::to_string_pretty(collections)?;

        // Write beside the target then rename so readers never see half a file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut collections = self.read()?;
        let documents = collections.remove(collection).unwrap_or_default();
        debug!(collection, count = documents.len(), "listed documents");
        Ok(documents)
    }

    fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut collections = self.read()?;
        let id = Uuid::new_v4().simple().to_string();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        self.write(&collections)?;
        debug!(collection, %id, "added document");
        Ok(id)
    }
}
