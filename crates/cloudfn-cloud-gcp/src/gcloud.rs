//! gcloud CLI wrapper
//!
//! Wraps the gcloud CLI commands for Cloud Functions operations. Deploys and
//! deletes inherit the terminal so gcloud can show progress and ask its own
//! questions; queries capture stdout.

use crate::error::{GcpError, Result};
use cloudfn_cloud::{DeployRequest, DeployedFunction};
use cloudfn_core::TriggerKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const STORAGE_EVENT: &str = "google.storage.object.finalize";
const FIRESTORE_EVENT_PREFIX: &str = "providers/cloud.firestore/eventTypes/document.";

/// gcloud CLI wrapper
pub struct Gcloud {
    working_dir: PathBuf,
}

impl Gcloud {
    /// Commands run inside `working_dir`, which gcloud uses as the function source
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Check that gcloud is installed
    pub async fn check_installed(&self) -> Result<()> {
        let which = Command::new("which").arg("gcloud").output().await?;

        if !which.status.success() {
            return Err(GcpError::GcloudNotFound);
        }
        Ok(())
    }

    /// Active account, if any
    pub async fn active_account(&self) -> Result<Option<String>> {
        self.check_installed().await?;

        let output = self
            .run_command(&[
                "auth",
                "list",
                "--filter=status:ACTIVE",
                "--format=value(account)",
            ])
            .await?;

        Ok(output
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string))
    }

    /// Run a gcloud command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("gcloud");
        cmd.args(args);
        cmd.current_dir(&self.working_dir);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: gcloud {}", args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GcpError::CommandFailed(stderr.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a gcloud command attached to the terminal
    async fn run_interactive(&self, args: &[String]) -> Result<()> {
        let mut cmd = Command::new("gcloud");
        cmd.args(args);
        cmd.current_dir(&self.working_dir);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        tracing::debug!("Running: gcloud {}", args.join(" "));

        let status = cmd.status().await?;

        if !status.success() {
            return Err(GcpError::CommandFailed(format!(
                "gcloud {} exited with {}",
                args.iter().take(3).cloned().collect::<Vec<_>>().join(" "),
                status
            )));
        }
        Ok(())
    }

    /// List every deployed function in the current project
    pub async fn list_functions(&self) -> Result<Vec<DeployedFunction>> {
        let output = self
            .run_command(&["functions", "list", "--format=json"])
            .await?;
        parse_functions_list(&output)
    }

    /// Deploy a python function
    pub async fn deploy(&self, request: &DeployRequest, runtime: &str, project_id: &str) -> Result<()> {
        let args = deploy_args(request, runtime, project_id)?;
        self.run_interactive(&args).await
    }

    /// Delete a deployed function
    pub async fn delete_function(&self, name: &str) -> Result<()> {
        let args = ["functions", "delete", name].map(String::from);
        self.run_interactive(&args).await
    }

    pub async fn set_account(&self, account: &str) -> Result<()> {
        self.run_command(&["config", "set", "account", account])
            .await?;
        Ok(())
    }

    pub async fn set_project(&self, project_id: &str) -> Result<()> {
        self.run_command(&["config", "set", "project", project_id])
            .await?;
        Ok(())
    }

    /// Activate a service account from a key file
    pub async fn activate_service_account(&self, email: &str, key_file: &Path) -> Result<()> {
        let key_arg = format!("--key-file={}", key_file.display());
        self.run_command(&["auth", "activate-service-account", email, &key_arg])
            .await
            .map_err(|e| GcpError::AuthenticationFailed(e.to_string()))?;
        Ok(())
    }

    /// Whether the active account can see `project_id`
    pub async fn has_project_access(&self, project_id: &str) -> Result<bool> {
        let output = self
            .run_command(&["projects", "list", "--format=list"])
            .await?;
        Ok(lists_project(&output, project_id))
    }
}

/// Entry in `gcloud functions list --format=json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionListEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    entry_point: Option<String>,
    #[serde(default)]
    runtime: String,
}

impl FunctionListEntry {
    /// Entry point, or the last segment of the resource name
    fn entry_name(&self) -> String {
        match &self.entry_point {
            Some(entry) if !entry.is_empty() => entry.clone(),
            _ => self
                .name
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

pub fn parse_functions_list(output: &str) -> Result<Vec<DeployedFunction>> {
    if output.trim().is_empty() || output.trim() == "[]" {
        return Ok(Vec::new());
    }

    let entries: Vec<FunctionListEntry> = serde_json::from_str(output)?;
    Ok(entries
        .into_iter()
        .map(|e| DeployedFunction::new(e.entry_name(), e.runtime))
        .collect())
}

/// Look for a `projectId: ID` line in `gcloud projects list --format=list`
pub fn lists_project(output: &str, project_id: &str) -> bool {
    output.lines().any(|line| {
        line.trim()
            .strip_prefix("projectId:")
            .is_some_and(|id| id.trim() == project_id)
    })
}

/// gcloud arguments for deploying one function
pub fn deploy_args(request: &DeployRequest, runtime: &str, project_id: &str) -> Result<Vec<String>> {
    let mut args: Vec<String> = ["functions", "deploy", request.name.as_str(), "--runtime", runtime]
        .map(String::from)
        .to_vec();

    match request.trigger {
        TriggerKind::Http => {
            args.push("--trigger-http".to_string());
            if let Some(file) = &request.env_vars_file {
                args.push("--env-vars-file".to_string());
                args.push(file.display().to_string());
            }
        }
        TriggerKind::Storage => {
            args.push("--trigger-resource".to_string());
            args.push(format!("{}.appspot.com", project_id));
            args.push("--trigger-event".to_string());
            args.push(STORAGE_EVENT.to_string());
        }
        kind if kind.is_firestore() => {
            let Some(path) = &request.document_path else {
                return Err(GcpError::MissingDocumentPath(request.name.clone()));
            };
            let operation = kind.firestore_operation().unwrap_or_default();
            args.push("--trigger-event".to_string());
            args.push(format!("{}{}", FIRESTORE_EVENT_PREFIX, operation));
            args.push("--trigger-resource".to_string());
            args.push(path.trigger_resource(project_id));
        }
        kind => {
            return Err(GcpError::NotDeployable(
                request.name.clone(),
                kind.to_string(),
            ));
        }
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudfn_core::DocumentPath;

    fn args(request: &DeployRequest) -> String {
        deploy_args(request, "python37", "demo-project")
            .unwrap()
            .join(" ")
    }

    #[test]
    fn test_http_args() {
        let request = DeployRequest::new("hello", TriggerKind::Http);
        assert_eq!(
            args(&request),
            "functions deploy hello --runtime python37 --trigger-http"
        );

        let request = request.with_env_vars_file(Some(PathBuf::from(".env.yaml")));
        assert_eq!(
            args(&request),
            "functions deploy hello --runtime python37 --trigger-http --env-vars-file .env.yaml"
        );
    }

    #[test]
    fn test_storage_args() {
        let request = DeployRequest::new("on_upload", TriggerKind::Storage);
        assert_eq!(
            args(&request),
            "functions deploy on_upload --runtime python37 \
             --trigger-resource demo-project.appspot.com \
             --trigger-event google.storage.object.finalize"
        );
    }

    #[test]
    fn test_firestore_args() {
        let path = DocumentPath::parse("musicians/{musicians}").unwrap();
        for (kind, op) in [
            (TriggerKind::FirestoreCreate, "create"),
            (TriggerKind::FirestoreUpdate, "update"),
            (TriggerKind::FirestoreDelete, "delete"),
            (TriggerKind::FirestoreWrite, "write"),
        ] {
            let request = DeployRequest::new("on_change", kind).with_document_path(path.clone());
            assert_eq!(
                args(&request),
                format!(
                    "functions deploy on_change --runtime python37 \
                     --trigger-event providers/cloud.firestore/eventTypes/document.{} \
                     --trigger-resource projects/demo-project/databases/(default)/documents/musicians/{{musicians}}",
                    op
                )
            );
        }
    }

    #[test]
    fn test_firestore_without_path_is_error() {
        let request = DeployRequest::new("on_create", TriggerKind::FirestoreCreate);
        assert!(matches!(
            deploy_args(&request, "python37", "p"),
            Err(GcpError::MissingDocumentPath(_))
        ));
    }

    #[test]
    fn test_unknown_is_not_deployable() {
        let request = DeployRequest::new("mystery", TriggerKind::Unknown);
        assert!(matches!(
            deploy_args(&request, "python37", "p"),
            Err(GcpError::NotDeployable(_, _))
        ));
    }

    #[test]
    fn test_parse_functions_list() {
        let output = r#"[
            {"name": "projects/p/locations/us-central1/functions/hello", "entryPoint": "hello", "runtime": "python37"},
            {"name": "projects/p/locations/us-central1/functions/api", "runtime": "nodejs10"}
        ]"#;
        let functions = parse_functions_list(output).unwrap();
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0], DeployedFunction::new("hello", "python37"));
        assert_eq!(functions[1], DeployedFunction::new("api", "nodejs10"));

        assert!(parse_functions_list("[]").unwrap().is_empty());
        assert!(parse_functions_list("\n").unwrap().is_empty());
        assert!(parse_functions_list("not json").is_err());
    }

    #[test]
    fn test_lists_project() {
        let output = "---\ncreateTime: '2019-01-01'\nname: Demo\nprojectId: demo-project\n---\nprojectId: other\n";
        assert!(lists_project(output, "demo-project"));
        assert!(lists_project(output, "other"));
        assert!(!lists_project(output, "demo"));
    }
}
