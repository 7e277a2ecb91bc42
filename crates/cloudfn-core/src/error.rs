use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("File read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Unknown trigger kind: {0} (expected http, storage, firestore-create, firestore-update, firestore-delete or firestore-write)")]
    UnknownTrigger(String),

    #[error("Invalid document path '{path}': {reason}")]
    InvalidDocumentPath { path: String, reason: String },

    #[error("Malformed definition of '{name}' at line {line}: {reason}")]
    MalformedDefinition {
        name: String,
        line: usize,
        reason: String,
    },

    #[error(
        "Project directory not found\nsearch started at: {0}\nhint: run inside a directory containing main.py or functions.kdl, or pass --project-dir"
    )]
    ProjectRootNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, FunctionError>;
