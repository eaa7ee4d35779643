//! Document store: single-document fetch and save by collection + id.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Errors that can occur when talking to a document store.
#[derive(Debug)]
pub enum StoreError {
    /// Collection or document id is empty or would escape the store.
    InvalidKey(String),
    Io(io::Error),
    /// Stored content is not valid JSON.
    Json(serde_json::Error),
    /// In-memory store lock was poisoned.
    Poisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::InvalidKey(key) => write!(f, "Invalid document key: {:?}", key),
            StoreError::Io(e) => write!(f, "Document store I/O error: {}", e),
            StoreError::Json(e) => write!(f, "Stored document is not valid JSON: {}", e),
            StoreError::Poisoned => write!(f, "Document store lock error"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
            StoreError::InvalidKey(_) | StoreError::Poisoned => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Read/write access to JSON documents addressed by collection and id.
pub trait DocumentStore {
    /// `Ok(None)` when the document does not exist.
    fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Create or replace a document.
    fn save(&self, collection: &str, id: &str, document: &Value) -> Result<(), StoreError>;
}

/// Keys become path segments, so they must be plain names.
fn check_key(key: &str) -> Result<&str, StoreError> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(|c: char| c == '/' || c == '\\' || c == '\0');
    if bad {
        Err(StoreError::InvalidKey(key.to_string()))
    } else {
        Ok(key)
    }
}

/// One pretty-printed JSON file per document at `<root>/<collection>/<id>.json`.
#[derive(Clone, Debug)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, StoreError> {
        let collection = check_key(collection)?;
        let id = check_key(id)?;
        Ok(self.root.join(collection).join(format!("{}.json", id)))
    }
}

impl DocumentStore for JsonDirStore {
    fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let path = self.document_path(collection, id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, collection: &str, id: &str, document: &Value) -> Result<(), StoreError> {
        let path = self.document_path(collection, id)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_vec_pretty(document)?)?;
        log::debug!("Saved document {}/{} to {}", collection, id, path.display());
        Ok(())
    }
}

/// Documents held in memory, keyed by `(collection, id)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn fetch(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let documents = self.documents.read().map_err(|_| StoreError::Poisoned)?;
        Ok(documents
            .get(&(check_key(collection)?.to_string(), check_key(id)?.to_string()))
            .cloned())
    }

    fn save(&self, collection: &str, id: &str, document: &Value) -> Result<(), StoreError> {
        let key = (check_key(collection)?.to_string(), check_key(id)?.to_string());
        let mut documents = self.documents.write().map_err(|_| StoreError::Poisoned)?;
        documents.insert(key, document.clone());
        Ok(())
    }
}
