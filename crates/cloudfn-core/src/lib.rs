//! cloudfn core
//!
//! Local side of a functions project: the function model, the trigger
//! classifier for the functions module and the functions.kdl manifest.

pub mod classifier;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod model;

pub use classifier::{ScannedFunction, classify, classify_event, scan_module};
pub use discovery::{PROJECT_DIR_ENV, find_project_root, find_project_root_from};
pub use error::{FunctionError, Result};
pub use loader::{Project, classify_source, load_project};
pub use manifest::{MANIFEST_FILE, Manifest, Settings, parse_manifest, parse_manifest_file};
pub use model::{
    DEFAULT_DOCUMENT_PATH, DeclarationSource, DocumentPath, FunctionDescriptor, FunctionSet,
    TriggerKind,
};
