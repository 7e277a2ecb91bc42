//! Document path registry
//!
//! Remembers the Firestore document path chosen for each trigger function in
//! `doc_path.json`, so repeat deploys do not prompt again.

use crate::error::{ConfigError, Result};
use cloudfn_core::DocumentPath;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DOC_PATH_FILE: &str = "doc_path.json";

#[derive(Debug, Clone)]
pub struct DocPathRegistry {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl DocPathRegistry {
    /// Load the registry, or start empty when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            debug!(path = %path.display(), "Document path registry not found, starting empty");
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::io(&path, e))?;
        let entries: BTreeMap<String, String> = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content).map_err(|e| ConfigError::Json {
                path: path.clone(),
                message: e.to_string(),
            })?
        };

        debug!(path = %path.display(), count = entries.len(), "Loaded document paths");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached path for a function
    ///
    /// Entries that are not valid document paths are ignored.
    pub fn get(&self, function: &str) -> Option<DocumentPath> {
        let raw = self.entries.get(function)?;
        match DocumentPath::parse(raw) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(function = %function, error = %e, "Ignoring cached document path");
                None
            }
        }
    }

    pub fn contains(&self, function: &str) -> bool {
        self.get(function).is_some()
    }

    /// Record a path and write the whole registry back to disk
    pub fn set(&mut self, function: &str, path: &DocumentPath) -> Result<()> {
        self.entries
            .insert(function.to_string(), path.as_str().to_string());
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries).map_err(|e| ConfigError::Json {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, content).map_err(|e| ConfigError::io(&self.path, e))?;
        debug!(path = %self.path.display(), count = self.entries.len(), "Saved document paths");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
