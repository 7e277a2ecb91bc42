//! Local state files used by cloudfn
//!
//! - `.env`: cached account, project id and access flag
//! - `doc_path.json`: Firestore document path per trigger function
//! - `.firebaserc`: default Firebase project
//! - `.env.yaml`: runtime variables passed to gcloud with `--env`

pub mod doc_paths;
pub mod env_file;
pub mod env_vars;
pub mod error;
pub mod firebaserc;

pub use doc_paths::{DOC_PATH_FILE, DocPathRegistry};
pub use env_file::{ENV_FILE, EnvFile, Variables, parse_env};
pub use env_vars::load_env_vars_file;
pub use error::{ConfigError, Result};
pub use firebaserc::{FIREBASERC_FILE, read_default_project};
