//! Functions provider trait definition

use crate::error::Result;
use async_trait::async_trait;
use cloudfn_core::{DocumentPath, TriggerKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Functions provider abstraction trait
///
/// A provider deploys, lists and deletes functions by driving the vendor's
/// command-line tools.
#[async_trait]
pub trait FunctionsProvider: Send + Sync {
    /// Returns the provider name (e.g., "gcp")
    fn name(&self) -> &str;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str;

    /// Check if the provider CLI is installed and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// List every function currently deployed in the project
    async fn list_deployed(&self) -> Result<DeployedFunctions>;

    /// Deploy a single python function
    async fn deploy(&self, request: &DeployRequest) -> Result<()>;

    /// Deploy node functions through the hosting CLI; `None` deploys all of them
    async fn deploy_node(&self, name: Option<&str>) -> Result<()>;

    /// Delete a deployed function
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Everything needed to deploy one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub name: String,
    pub trigger: TriggerKind,
    /// Required for Firestore triggers
    pub document_path: Option<DocumentPath>,
    /// Runtime variables file, only used for HTTP functions
    pub env_vars_file: Option<PathBuf>,
}

impl DeployRequest {
    pub fn new(name: impl Into<String>, trigger: TriggerKind) -> Self {
        Self {
            name: name.into(),
            trigger,
            document_path: None,
            env_vars_file: None,
        }
    }

    pub fn with_document_path(mut self, path: DocumentPath) -> Self {
        self.document_path = Some(path);
        self
    }

    pub fn with_env_vars_file(mut self, path: Option<PathBuf>) -> Self {
        self.env_vars_file = path;
        self
    }
}

/// Runtime family of a deployed function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeFamily {
    Python,
    Node,
    Other,
}

impl RuntimeFamily {
    pub fn from_runtime(runtime: &str) -> Self {
        if runtime.contains("python") {
            RuntimeFamily::Python
        } else if runtime.contains("node") {
            RuntimeFamily::Node
        } else {
            RuntimeFamily::Other
        }
    }
}

/// A function reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedFunction {
    /// Entry point name
    pub name: String,
    pub runtime: String,
}

impl DeployedFunction {
    pub fn new(name: impl Into<String>, runtime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runtime: runtime.into(),
        }
    }

    pub fn family(&self) -> RuntimeFamily {
        RuntimeFamily::from_runtime(&self.runtime)
    }
}

/// Remote function inventory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployedFunctions {
    pub functions: Vec<DeployedFunction>,
}

impl DeployedFunctions {
    pub fn new(functions: Vec<DeployedFunction>) -> Self {
        Self { functions }
    }

    pub fn by_family(&self, family: RuntimeFamily) -> Vec<&DeployedFunction> {
        self.functions
            .iter()
            .filter(|f| f.family() == family)
            .collect()
    }

    pub fn python(&self) -> Vec<&DeployedFunction> {
        self.by_family(RuntimeFamily::Python)
    }

    pub fn node(&self) -> Vec<&DeployedFunction> {
        self.by_family(RuntimeFamily::Node)
    }

    pub fn contains_python(&self, name: &str) -> bool {
        self.python().iter().any(|f| f.name == name)
    }
}
