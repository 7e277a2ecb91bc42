//! Account and project resolution
//!
//! Each value is looked up in the process environment and the `.env` file
//! first. Interactive answers and the outcome of the access check are
//! appended to `.env` so the next run does not ask again.

use crate::error::{GcpError, Result};
use crate::gcloud::Gcloud;
use cloudfn_cloud::Prompter;
use cloudfn_config::{FIREBASERC_FILE, Variables, read_default_project};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const GCLOUD_ACCOUNT: &str = "GCLOUD_ACCOUNT";
pub const PROJECT_ID: &str = "PROJECT_ID";
pub const ACCESS: &str = "ACCESS";
pub const CI_CD: &str = "CI_CD";
pub const GCLOUD: &str = "GCLOUD";
pub const FIREBASE_TOKEN: &str = "FIREBASE_TOKEN";

/// Service account key written in CI mode
pub const CI_CD_KEY_FILE: &str = "ci_cd_key.json";

/// Resolved account, project and access for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEnvironment {
    /// User account; `None` when a service account is used
    pub account: Option<String>,
    pub project_id: String,
    pub access: bool,
    /// Passed to firebase in CI mode
    pub firebase_token: Option<String>,
}

pub struct EnvironmentResolver<'a, Q: Prompter + ?Sized> {
    project_root: PathBuf,
    variables: &'a mut Variables,
    prompter: &'a mut Q,
}

impl<'a, Q: Prompter + ?Sized> EnvironmentResolver<'a, Q> {
    pub fn new(
        project_root: impl Into<PathBuf>,
        variables: &'a mut Variables,
        prompter: &'a mut Q,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            variables,
            prompter,
        }
    }

    pub fn is_ci(&self) -> bool {
        self.variables.is_set(CI_CD)
    }

    /// Configure gcloud and return the resolved environment
    ///
    /// Fails with [`GcpError::NoProjectAccess`] when the account cannot see
    /// the project.
    pub async fn setup(&mut self, gcloud: &Gcloud) -> Result<DeploymentEnvironment> {
        gcloud.check_installed().await?;

        let account = if self.is_ci() {
            let (email, key_file) = self.write_service_account_key()?;
            info!(account = %email, "Activating service account");
            gcloud.activate_service_account(&email, &key_file).await?;
            None
        } else {
            let account = self.resolve_account()?;
            info!(account = %account, "Using gcloud account");
            gcloud.set_account(&account).await?;
            Some(account)
        };

        let project_id = self.resolve_project_id()?;

        let access = match self.cached_access()? {
            Some(access) => access,
            None => {
                let access = gcloud.has_project_access(&project_id).await?;
                self.record_access(access)?;
                access
            }
        };

        if !access {
            return Err(GcpError::NoProjectAccess(project_id));
        }

        info!(project = %project_id, "Using project");
        gcloud.set_project(&project_id).await?;

        Ok(DeploymentEnvironment {
            account,
            project_id,
            access,
            firebase_token: self.firebase_token(),
        })
    }

    /// `GCLOUD_ACCOUNT`, or ask and remember the answer
    pub fn resolve_account(&mut self) -> Result<String> {
        if let Some(account) = self.variables.get(GCLOUD_ACCOUNT) {
            return Ok(account.to_string());
        }

        let account = self.ask_non_empty("Enter gcloud account: ")?;
        self.variables.persist(GCLOUD_ACCOUNT, &account)?;
        Ok(account)
    }

    /// `projects.default` in `../.firebaserc`, then `PROJECT_ID`, then ask
    pub fn resolve_project_id(&mut self) -> Result<String> {
        if let Some(firebaserc) = self.firebaserc_path()
            && let Some(project) = read_default_project(&firebaserc)?
        {
            debug!(path = %firebaserc.display(), "Project id from .firebaserc");
            return Ok(project);
        }

        if let Some(project) = self.variables.get(PROJECT_ID) {
            return Ok(project.to_string());
        }

        let project = self.ask_non_empty("Enter project id: ")?;
        self.variables.persist(PROJECT_ID, &project)?;
        Ok(project)
    }

    /// Access flag cached in `ACCESS`
    pub fn cached_access(&self) -> Result<Option<bool>> {
        self.variables.get(ACCESS).map(parse_access).transpose()
    }

    pub fn record_access(&mut self, access: bool) -> Result<()> {
        self.variables.persist(ACCESS, &access.to_string())?;
        Ok(())
    }

    /// Write the service account JSON from `GCLOUD` to the key file
    ///
    /// Returns the account email and the key file path.
    pub fn write_service_account_key(&self) -> Result<(String, PathBuf)> {
        let raw = self
            .variables
            .get(GCLOUD)
            .ok_or(GcpError::MissingCiVariable(GCLOUD))?;

        let key: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| GcpError::InvalidServiceAccountKey(e.to_string()))?;
        let email = key
            .get("client_email")
            .and_then(|v| v.as_str())
            .ok_or_else(|| GcpError::InvalidServiceAccountKey("missing client_email".to_string()))?
            .to_string();

        let path = key_file_path(&self.project_root);
        std::fs::write(&path, serde_json::to_string(&key)?)?;
        debug!(path = %path.display(), "Wrote service account key");

        Ok((email, path))
    }

    pub fn firebase_token(&self) -> Option<String> {
        if !self.is_ci() {
            return None;
        }
        self.variables.get(FIREBASE_TOKEN).map(str::to_string)
    }

    fn firebaserc_path(&self) -> Option<PathBuf> {
        self.project_root
            .parent()
            .map(|parent| parent.join(FIREBASERC_FILE))
    }

    fn ask_non_empty(&mut self, message: &str) -> Result<String> {
        loop {
            let answer = self.prompter.input(message)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }
}

/// Parse a cached access flag
pub fn parse_access(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(GcpError::InvalidAccessFlag(value.to_string())),
    }
}

/// Path of the service account key inside a project
pub fn key_file_path(project_root: &Path) -> PathBuf {
    project_root.join(CI_CD_KEY_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudfn_cloud::ScriptedPrompter;
    use cloudfn_config::{ENV_FILE, EnvFile};
    use std::collections::HashMap;
    use std::fs;

    struct Fixture {
        _temp: tempfile::TempDir,
        root: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("functions");
        fs::create_dir(&root).unwrap();
        Fixture { _temp: temp, root }
    }

    fn variables(root: &Path, process: &[(&str, &str)]) -> Variables {
        let process: HashMap<String, String> = process
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Variables::new(process, EnvFile::load(root.join(ENV_FILE)).unwrap())
    }

    #[test]
    fn test_account_prompted_and_persisted() {
        let fx = fixture();
        let mut vars = variables(&fx.root, &[]);
        let mut prompter = ScriptedPrompter::new(["", "dev@example.com"]);

        let account = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter)
            .resolve_account()
            .unwrap();

        assert_eq!(account, "dev@example.com");
        let env = fs::read_to_string(fx.root.join(ENV_FILE)).unwrap();
        assert_eq!(env, "GCLOUD_ACCOUNT=dev@example.com\n");
        assert_eq!(vars.get(GCLOUD_ACCOUNT), Some("dev@example.com"));
    }

    #[test]
    fn test_account_from_env_file() {
        let fx = fixture();
        fs::write(fx.root.join(ENV_FILE), "GCLOUD_ACCOUNT=saved@example.com\n").unwrap();
        let mut vars = variables(&fx.root, &[]);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let account = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter)
            .resolve_account()
            .unwrap();

        assert_eq!(account, "saved@example.com");
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_project_id_prefers_firebaserc() {
        let fx = fixture();
        fs::write(
            fx.root.parent().unwrap().join(FIREBASERC_FILE),
            r#"{"projects": {"default": "from-rc"}}"#,
        )
        .unwrap();
        let mut vars = variables(&fx.root, &[(PROJECT_ID, "from-env")]);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());

        let project = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter)
            .resolve_project_id()
            .unwrap();
        assert_eq!(project, "from-rc");
    }

    #[test]
    fn test_project_id_from_variable_then_prompt() {
        let fx = fixture();
        let mut vars = variables(&fx.root, &[(PROJECT_ID, "from-env")]);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let project = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter)
            .resolve_project_id()
            .unwrap();
        assert_eq!(project, "from-env");

        let mut vars = variables(&fx.root, &[]);
        let mut prompter = ScriptedPrompter::new(["typed-project"]);
        let project = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter)
            .resolve_project_id()
            .unwrap();
        assert_eq!(project, "typed-project");
        let env = fs::read_to_string(fx.root.join(ENV_FILE)).unwrap();
        assert!(env.contains("PROJECT_ID=typed-project"));
    }

    #[test]
    fn test_access_flag() {
        let fx = fixture();
        let mut vars = variables(&fx.root, &[(ACCESS, "False")]);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let resolver = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter);
        assert_eq!(resolver.cached_access().unwrap(), Some(false));

        let mut vars = variables(&fx.root, &[]);
        let mut resolver = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter);
        assert_eq!(resolver.cached_access().unwrap(), None);
        resolver.record_access(true).unwrap();
        assert_eq!(resolver.cached_access().unwrap(), Some(true));

        assert!(parse_access("TRUE").unwrap());
        assert!(matches!(
            parse_access("maybe"),
            Err(GcpError::InvalidAccessFlag(_))
        ));
    }

    #[test]
    fn test_service_account_key() {
        let fx = fixture();
        let key = r#"{"type": "service_account", "client_email": "ci@demo.iam.gserviceaccount.com"}"#;
        let mut vars = variables(
            &fx.root,
            &[(CI_CD, "1"), (GCLOUD, key), (FIREBASE_TOKEN, "tok")],
        );
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let resolver = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter);

        assert!(resolver.is_ci());
        let (email, path) = resolver.write_service_account_key().unwrap();
        assert_eq!(email, "ci@demo.iam.gserviceaccount.com");
        assert_eq!(path, key_file_path(&fx.root));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["type"], "service_account");
        assert_eq!(resolver.firebase_token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_service_account_key_errors() {
        let fx = fixture();
        let mut vars = variables(&fx.root, &[(CI_CD, "1")]);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let resolver = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter);
        assert!(matches!(
            resolver.write_service_account_key(),
            Err(GcpError::MissingCiVariable(GCLOUD))
        ));

        let mut vars = variables(&fx.root, &[(CI_CD, "1"), (GCLOUD, r#"{"type": "x"}"#)]);
        let resolver = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter);
        assert!(matches!(
            resolver.write_service_account_key(),
            Err(GcpError::InvalidServiceAccountKey(_))
        ));
    }

    #[test]
    fn test_firebase_token_only_in_ci() {
        let fx = fixture();
        let mut vars = variables(&fx.root, &[(FIREBASE_TOKEN, "tok")]);
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        let resolver = EnvironmentResolver::new(&fx.root, &mut vars, &mut prompter);
        assert_eq!(resolver.firebase_token(), None);
    }
}
