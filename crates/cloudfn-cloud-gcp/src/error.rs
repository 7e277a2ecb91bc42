//! Google Cloud provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcpError {
    #[error("gcloud not found. Please install the Google Cloud SDK: https://cloud.google.com/sdk/docs/install")]
    GcloudNotFound,

    #[error("firebase not found. Please install: npm install -g firebase-tools")]
    FirebaseNotFound,

    #[error("gcloud authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error(
        "You do not have access to project {0}. Please request access to project from project Owner/Admin."
    )]
    NoProjectAccess(String),

    #[error("Invalid service account key in GCLOUD: {0}")]
    InvalidServiceAccountKey(String),

    #[error("CI_CD is set but {0} is empty")]
    MissingCiVariable(&'static str),

    #[error("Invalid ACCESS value '{0}' (expected true or false)")]
    InvalidAccessFlag(String),

    #[error("Function {0} is a Firestore trigger but no document path was given")]
    MissingDocumentPath(String),

    #[error("Trigger kind '{1}' of function {0} cannot be deployed")]
    NotDeployable(String, String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Cloud(#[from] cloudfn_cloud::CloudError),

    #[error(transparent)]
    Config(#[from] cloudfn_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, GcpError>;

impl From<GcpError> for cloudfn_cloud::CloudError {
    fn from(e: GcpError) -> Self {
        use cloudfn_cloud::CloudError;
        match e {
            GcpError::GcloudNotFound | GcpError::FirebaseNotFound => {
                CloudError::ToolNotFound(e.to_string())
            }
            GcpError::AuthenticationFailed(msg) => CloudError::AuthenticationFailed(msg),
            GcpError::CommandFailed(msg) => CloudError::CommandFailed(msg),
            GcpError::MissingDocumentPath(name) => CloudError::MissingDocumentPath(name),
            GcpError::NotDeployable(name, trigger) => CloudError::NotDeployable { name, trigger },
            GcpError::Cloud(e) => e,
            GcpError::Config(e) => CloudError::Config(e),
            other => CloudError::ApiError(other.to_string()),
        }
    }
}
