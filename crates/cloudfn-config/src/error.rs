use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("Invalid JSON in {path}: {message}")]
    Json { path: PathBuf, message: String },

    #[error("Env vars file not found: {0}\nhint: create it or deploy without --env")]
    EnvVarsFileNotFound(PathBuf),

    #[error("Invalid env vars file {path}: {message}")]
    InvalidEnvVars { path: PathBuf, message: String },

    #[error(transparent)]
    Function(#[from] cloudfn_core::FunctionError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub(crate) fn io(path: &std::path::Path, e: std::io::Error) -> Self {
        ConfigError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    }
}
