//! firebase CLI wrapper
//!
//! Node functions are deployed through `firebase deploy`.

use crate::error::{GcpError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// firebase CLI wrapper
pub struct Firebase {
    working_dir: PathBuf,
    token: Option<String>,
}

impl Firebase {
    pub fn new(working_dir: impl Into<PathBuf>, token: Option<String>) -> Self {
        Self {
            working_dir: working_dir.into(),
            token,
        }
    }

    /// Check that firebase is installed
    pub async fn check_installed(&self) -> Result<()> {
        let which = Command::new("which").arg("firebase").output().await?;

        if !which.status.success() {
            return Err(GcpError::FirebaseNotFound);
        }
        Ok(())
    }

    /// Run a firebase command attached to the terminal
    async fn run_interactive(&self, args: &[String]) -> Result<()> {
        let mut cmd = Command::new("firebase");
        cmd.args(args);
        cmd.current_dir(&self.working_dir);
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        // the token stays out of the log
        tracing::debug!(
            "Running: firebase {}",
            redact_token(args).join(" ")
        );

        let status = cmd.status().await?;

        if !status.success() {
            return Err(GcpError::CommandFailed(format!(
                "firebase deploy exited with {}",
                status
            )));
        }
        Ok(())
    }

    /// Deploy one node function, or all of them with `None`
    pub async fn deploy_functions(&self, name: Option<&str>) -> Result<()> {
        self.check_installed().await?;
        let args = deploy_args(name, self.token.as_deref());
        self.run_interactive(&args).await
    }
}

/// firebase arguments for deploying node functions
pub fn deploy_args(name: Option<&str>, token: Option<&str>) -> Vec<String> {
    let target = match name {
        Some(name) => format!("functions:{}", name),
        None => "functions".to_string(),
    };

    let mut args = vec!["deploy".to_string(), "--only".to_string(), target];
    if let Some(token) = token {
        args.push("--token".to_string());
        args.push(token.to_string());
    }
    args
}

fn redact_token(args: &[String]) -> Vec<&str> {
    let mut redacted = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            redacted.push("***");
            hide_next = false;
        } else {
            hide_next = arg == "--token";
            redacted.push(arg.as_str());
        }
    }
    redacted
}
