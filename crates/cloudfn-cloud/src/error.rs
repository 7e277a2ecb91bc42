//! Cloud provider error types

use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("CLI tool not found: {0}")]
    ToolNotFound(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Function not found: {0}")]
    FunctionNotFound(String),

    #[error("Function {name} has trigger kind '{trigger}', which cannot be deployed. Declare its trigger in functions.kdl")]
    NotDeployable { name: String, trigger: String },

    #[error("Function {0} is a Firestore trigger but no document path was given")]
    MissingDocumentPath(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] cloudfn_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, CloudError>;
