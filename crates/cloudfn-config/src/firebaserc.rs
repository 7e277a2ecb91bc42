//! `.firebaserc` project lookup

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const FIREBASERC_FILE: &str = ".firebaserc";

#[derive(Debug, Deserialize)]
struct FirebaseRc {
    #[serde(default)]
    projects: HashMap<String, String>,
}

/// Default project alias from a `.firebaserc`, if the file exists
pub fn read_default_project(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let rc: FirebaseRc = serde_json::from_str(&content).map_err(|e| ConfigError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(rc.projects.get("default").cloned())
}
