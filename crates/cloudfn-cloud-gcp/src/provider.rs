//! Google Cloud Functions provider implementation

use crate::environment::DeploymentEnvironment;
use crate::error::GcpError;
use crate::firebase::Firebase;
use crate::gcloud::Gcloud;
use async_trait::async_trait;
use cloudfn_cloud::{AuthStatus, DeployRequest, DeployedFunctions, FunctionsProvider};
use std::path::PathBuf;

/// Google Cloud Functions provider
pub struct GcpProvider {
    gcloud: Gcloud,
    firebase: Firebase,
    project_id: String,
    runtime: String,
}

impl GcpProvider {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        project_id: impl Into<String>,
        runtime: impl Into<String>,
        firebase_token: Option<String>,
    ) -> Self {
        let working_dir = working_dir.into();
        Self {
            gcloud: Gcloud::new(&working_dir),
            firebase: Firebase::new(working_dir, firebase_token),
            project_id: project_id.into(),
            runtime: runtime.into(),
        }
    }

    /// Provider for a resolved deployment environment
    pub fn for_environment(
        working_dir: impl Into<PathBuf>,
        environment: &DeploymentEnvironment,
        runtime: impl Into<String>,
    ) -> Self {
        Self::new(
            working_dir,
            environment.project_id.clone(),
            runtime,
            environment.firebase_token.clone(),
        )
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }
}

#[async_trait]
impl FunctionsProvider for GcpProvider {
    fn name(&self) -> &str {
        "gcp"
    }

    fn display_name(&self) -> &str {
        "Google Cloud Functions"
    }

    async fn check_auth(&self) -> cloudfn_cloud::Result<AuthStatus> {
        match self.gcloud.active_account().await {
            Ok(Some(account)) => Ok(AuthStatus::ok(format!("{} ({})", account, self.project_id))),
            Ok(None) => Ok(AuthStatus::failed("no active gcloud account")),
            Err(GcpError::GcloudNotFound) => Ok(AuthStatus::failed("gcloud is not installed")),
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn list_deployed(&self) -> cloudfn_cloud::Result<DeployedFunctions> {
        let functions = self.gcloud.list_functions().await?;
        Ok(DeployedFunctions::new(functions))
    }

    async fn deploy(&self, request: &DeployRequest) -> cloudfn_cloud::Result<()> {
        self.gcloud
            .deploy(request, &self.runtime, &self.project_id)
            .await?;
        Ok(())
    }

    async fn deploy_node(&self, name: Option<&str>) -> cloudfn_cloud::Result<()> {
        self.firebase.deploy_functions(name).await?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> cloudfn_cloud::Result<()> {
        self.gcloud.delete_function(name).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_identity() {
        let provider = GcpProvider::new(".", "demo-project", "python37", None);
        assert_eq!(provider.name(), "gcp");
        assert_eq!(provider.project_id(), "demo-project");
        assert_eq!(provider.runtime(), "python37");
    }

    #[test]
    fn test_for_environment() {
        let environment = DeploymentEnvironment {
            account: None,
            project_id: "ci-project".to_string(),
            access: true,
            firebase_token: Some("tok".to_string()),
        };
        let provider = GcpProvider::for_environment(".", &environment, "python39");
        assert_eq!(provider.project_id(), "ci-project");
        assert_eq!(provider.runtime(), "python39");
    }
}
