//! functions.kdl manifest
//!
//! Declares trigger kinds explicitly instead of relying on the classifier,
//! and carries project-wide deploy settings.
//!
//! ```kdl
//! runtime "python37"
//! source "main.py"
//! default-document-path "musicians/{musicians}"
//! env-vars-file ".env.yaml"
//!
//! function "on_user_create" {
//!     trigger "firestore-create"
//!     document "users/{userId}"
//! }
//! ```

use crate::error::{FunctionError, Result};
use crate::model::{DeclarationSource, DocumentPath, FunctionDescriptor, TriggerKind};
use kdl::{KdlDocument, KdlNode};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "functions.kdl";
pub const DEFAULT_RUNTIME: &str = "python37";
pub const DEFAULT_SOURCE: &str = "main.py";
pub const DEFAULT_ENV_VARS_FILE: &str = ".env.yaml";

/// Project-wide deploy settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Runtime passed to `gcloud functions deploy --runtime`
    pub runtime: String,
    /// Functions module, relative to the project directory
    pub source: PathBuf,
    pub default_document_path: DocumentPath,
    /// Passed with `--env-vars-file` when deploying with `--env`
    pub env_vars_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            source: PathBuf::from(DEFAULT_SOURCE),
            default_document_path: DocumentPath::default(),
            env_vars_file: PathBuf::from(DEFAULT_ENV_VARS_FILE),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub settings: Settings,
    pub functions: Vec<FunctionDescriptor>,
}

/// Parse functions.kdl from disk
pub fn parse_manifest_file<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| FunctionError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_manifest(&content)
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    let doc: KdlDocument = content.parse()?;
    let mut manifest = Manifest::default();

    for node in doc.nodes() {
        match node.name().value() {
            "runtime" => {
                manifest.settings.runtime = required_string(node, "runtime")?;
            }
            "source" => {
                manifest.settings.source = PathBuf::from(required_string(node, "source")?);
            }
            "default-document-path" | "default_document_path" => {
                let raw = required_string(node, "default-document-path")?;
                manifest.settings.default_document_path = DocumentPath::parse(&raw)?;
            }
            "env-vars-file" | "env_vars_file" => {
                manifest.settings.env_vars_file =
                    PathBuf::from(required_string(node, "env-vars-file")?);
            }
            "function" => {
                let function = parse_function(node)?;
                if manifest.functions.iter().any(|f| f.name == function.name) {
                    return Err(FunctionError::InvalidManifest(format!(
                        "function '{}' is declared more than once",
                        function.name
                    )));
                }
                manifest.functions.push(function);
            }
            _ => {}
        }
    }

    Ok(manifest)
}

/// `function` node
fn parse_function(node: &KdlNode) -> Result<FunctionDescriptor> {
    let name = first_string(node).ok_or_else(|| {
        FunctionError::InvalidManifest("function requires a name".to_string())
    })?;

    // `function "name" trigger="http"` is accepted as shorthand
    let mut trigger = property_string(node, "trigger");
    let mut document = property_string(node, "document");

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "trigger" => trigger = first_string(child),
                "document" | "document-path" => document = first_string(child),
                _ => {}
            }
        }
    }

    let trigger: TriggerKind = trigger
        .ok_or_else(|| {
            FunctionError::InvalidManifest(format!("function '{}' requires a trigger", name))
        })?
        .parse()?;

    let mut function =
        FunctionDescriptor::new(name.clone(), trigger).with_source(DeclarationSource::Manifest);

    match document {
        Some(raw) if trigger.is_firestore() => {
            function = function.with_resource_path(DocumentPath::parse(&raw)?);
        }
        Some(_) => {
            return Err(FunctionError::InvalidManifest(format!(
                "function '{}': document is only valid for firestore triggers",
                name
            )));
        }
        None => {}
    }

    Ok(function)
}

fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn property_string(node: &KdlNode, key: &str) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().map(|n| n.value()) == Some(key))
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn required_string(node: &KdlNode, what: &str) -> Result<String> {
    first_string(node)
        .ok_or_else(|| FunctionError::InvalidManifest(format!("{} requires a string value", what)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_manifest_uses_defaults() {
        let manifest = parse_manifest("").unwrap();
        assert_eq!(manifest.settings, Settings::default());
        assert!(manifest.functions.is_empty());
    }

    #[test]
    fn test_parse_settings_and_functions() {
        let manifest = parse_manifest(
            r#"
runtime "python39"
source "functions/main.py"
default-document-path "bands/{band}"
env-vars-file "prod.env.yaml"

function "hello_http" {
    trigger "http"
}

function "on_user_create" {
    trigger "firestore-create"
    document "users/{userId}"
}

function "on_upload" trigger="storage"
"#,
        )
        .unwrap();

        assert_eq!(manifest.settings.runtime, "python39");
        assert_eq!(manifest.settings.source, PathBuf::from("functions/main.py"));
        assert_eq!(manifest.settings.default_document_path.as_str(), "bands/{band}");
        assert_eq!(manifest.settings.env_vars_file, PathBuf::from("prod.env.yaml"));

        assert_eq!(manifest.functions.len(), 3);
        assert_eq!(manifest.functions[0].trigger, TriggerKind::Http);
        assert_eq!(manifest.functions[1].trigger, TriggerKind::FirestoreCreate);
        assert_eq!(
            manifest.functions[1].resource_path.as_ref().unwrap().as_str(),
            "users/{userId}"
        );
        assert_eq!(manifest.functions[2].trigger, TriggerKind::Storage);
        assert!(
            manifest
                .functions
                .iter()
                .all(|f| f.source == DeclarationSource::Manifest)
        );
    }

    #[test]
    fn test_missing_trigger_is_error() {
        let result = parse_manifest(r#"function "x" { document "a/{b}" }"#);
        assert!(matches!(result, Err(FunctionError::InvalidManifest(_))));
    }

    #[test]
    fn test_unknown_trigger_is_error() {
        let result = parse_manifest(r#"function "x" { trigger "pubsub" }"#);
        assert!(matches!(result, Err(FunctionError::UnknownTrigger(_))));
    }

    #[test]
    fn test_document_on_http_is_error() {
        let result = parse_manifest(r#"function "x" { trigger "http"; document "a/{b}" }"#);
        assert!(matches!(result, Err(FunctionError::InvalidManifest(_))));
    }

    #[test]
    fn test_invalid_document_path_is_error() {
        let result =
            parse_manifest(r#"function "x" { trigger "firestore-write"; document "users" }"#);
        assert!(matches!(
            result,
            Err(FunctionError::InvalidDocumentPath { .. })
        ));
    }

    #[test]
    fn test_duplicate_function_is_error() {
        let result = parse_manifest(
            r#"
function "x" trigger="http"
function "x" trigger="storage"
"#,
        );
        assert!(result.is_err());
    }
}
