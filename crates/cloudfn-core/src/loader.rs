//! Project loading
//!
//! Combines the classifier result for the functions module with the explicit
//! declarations in functions.kdl. A manifest declaration always replaces the
//! heuristic result for the same name.

use crate::classifier::{classify, scan_module};
use crate::error::{FunctionError, Result};
use crate::manifest::{MANIFEST_FILE, Manifest, Settings, parse_manifest_file};
use crate::model::{FunctionDescriptor, FunctionSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A loaded functions project
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub settings: Settings,
    pub functions: FunctionSet,
}

impl Project {
    pub fn source_path(&self) -> PathBuf {
        self.root.join(&self.settings.source)
    }

    pub fn env_vars_path(&self) -> PathBuf {
        self.root.join(&self.settings.env_vars_file)
    }

    /// File name of the functions module, for user-facing messages
    pub fn source_name(&self) -> String {
        self.settings
            .source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.settings.source.display().to_string())
    }
}

#[tracing::instrument(skip_all, fields(root = %root.as_ref().display()))]
pub fn load_project(root: impl AsRef<Path>) -> Result<Project> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = root.join(MANIFEST_FILE);
    let manifest = if manifest_path.is_file() {
        debug!(path = %manifest_path.display(), "Loading manifest");
        parse_manifest_file(&manifest_path)?
    } else {
        Manifest::default()
    };

    let source_path = root.join(&manifest.settings.source);
    let mut functions = if source_path.is_file() {
        let content =
            std::fs::read_to_string(&source_path).map_err(|e| FunctionError::IoError {
                path: source_path.clone(),
                message: e.to_string(),
            })?;
        classify_source(&content)
    } else {
        if manifest.functions.is_empty() {
            warn!(path = %source_path.display(), "Functions module not found and no functions declared");
        }
        FunctionSet::new()
    };

    for declared in manifest.functions {
        if let Some(inferred) = functions.get(&declared.name) {
            debug!(
                function = %declared.name,
                inferred = %inferred.trigger,
                declared = %declared.trigger,
                "Manifest declaration overrides inferred trigger"
            );
        }
        functions.upsert(declared);
    }

    info!(count = functions.len(), "Loaded functions");

    Ok(Project {
        root,
        settings: manifest.settings,
        functions,
    })
}

/// Classify every function in a module's source
///
/// Malformed definitions are logged and left out.
pub fn classify_source(source: &str) -> FunctionSet {
    scan_module(source)
        .into_iter()
        .filter_map(|scanned| match scanned {
            Ok(function) => {
                let trigger = classify(&function)?;
                debug!(function = %function.name, trigger = %trigger, "Classified function");
                Some(FunctionDescriptor::new(function.name, trigger))
            }
            Err(e) => {
                warn!(error = %e, "Skipping function");
                None
            }
        })
        .collect()
}
