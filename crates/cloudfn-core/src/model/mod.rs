//! Data model for locally declared functions

mod document_path;
mod function;
mod trigger;

pub use document_path::{DEFAULT_DOCUMENT_PATH, DocumentPath};
pub use function::{DeclarationSource, FunctionDescriptor, FunctionSet};
pub use trigger::TriggerKind;
