//! Reconciliation driver
//!
//! Compares the locally declared functions with what the provider reports
//! as deployed, asks before deleting orphans and deploys local functions.
//! Everything runs sequentially; one failed command is recorded and the
//! run continues.

use crate::action::{Action, ActionType, ApplyResult, Plan};
use crate::error::{CloudError, Result};
use crate::prompt::Prompter;
use crate::provider::{DeployRequest, FunctionsProvider};
use cloudfn_config::DocPathRegistry;
use cloudfn_core::{DocumentPath, FunctionDescriptor, FunctionSet, TriggerKind};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Settings for a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Offered when a Firestore trigger has no known document path
    pub default_document_path: DocumentPath,
    /// Passed to HTTP deploys when set
    pub env_vars_file: Option<PathBuf>,
    /// Module name used in messages (e.g. "main.py")
    pub source_name: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            default_document_path: DocumentPath::default(),
            env_vars_file: None,
            source_name: "main.py".to_string(),
        }
    }
}

/// Outcome of `--delete NAME`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The function was deployed and has been deleted
    Deleted,
    /// Not deployed, but still declared locally
    AlreadyDeleted,
    /// Neither deployed nor declared
    NotFound,
    /// The delete command failed; the run goes on
    Failed(String),
}

pub struct Reconciler<'a, P: FunctionsProvider + ?Sized, Q: Prompter + ?Sized> {
    provider: &'a P,
    prompter: &'a mut Q,
    registry: &'a mut DocPathRegistry,
    options: ReconcileOptions,
}

impl<'a, P: FunctionsProvider + ?Sized, Q: Prompter + ?Sized> Reconciler<'a, P, Q> {
    pub fn new(
        provider: &'a P,
        prompter: &'a mut Q,
        registry: &'a mut DocPathRegistry,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            provider,
            prompter,
            registry,
            options,
        }
    }

    /// Build the reconciliation plan against the deployed functions
    pub async fn plan(&self, local: &FunctionSet) -> Result<Plan> {
        let remote = self.provider.list_deployed().await?;
        debug!(
            python = remote.python().len(),
            node = remote.node().len(),
            "Fetched deployed functions"
        );
        Ok(Plan::reconcile(local, &remote))
    }

    /// Ask about each delete candidate; declined ones become no-ops
    pub fn confirm_orphans(&mut self, plan: Plan) -> Result<Plan> {
        let mut actions = Vec::with_capacity(plan.actions.len());

        for action in plan.actions {
            if action.action_type != ActionType::Delete {
                actions.push(action);
                continue;
            }

            let question = format!(
                "Function {} is not defined in {}. Delete from cloud? [y/N]: ",
                action.function, self.options.source_name
            );
            if self.prompter.confirm(&question, false)? {
                actions.push(action);
            } else {
                info!(function = %action.function, "Keeping orphaned function");
                actions.push(Action::noop(
                    &action.function,
                    None,
                    format!("keep {} (not defined locally)", action.function),
                ));
            }
        }

        Ok(Plan::new(actions))
    }

    /// Execute a plan in order
    pub async fn apply(&mut self, plan: &Plan, local: &FunctionSet) -> ApplyResult {
        let mut result = ApplyResult::new();
        let start = Instant::now();

        for action in &plan.actions {
            match action.action_type {
                ActionType::Create | ActionType::Update => {
                    let Some(function) = local.get(&action.function) else {
                        result.add_failure(
                            action.id.clone(),
                            CloudError::FunctionNotFound(action.function.clone()).to_string(),
                        );
                        continue;
                    };
                    match self.deploy_function(function).await {
                        Ok(()) => result.add_success(
                            action.id.clone(),
                            format!("deployed {}", action.function),
                        ),
                        Err(e) => {
                            warn!(function = %action.function, error = %e, "Deploy failed");
                            result.add_failure(action.id.clone(), e.to_string());
                        }
                    }
                }
                ActionType::Delete => {
                    info!(function = %action.function, "Deleting function");
                    match self.provider.delete(&action.function).await {
                        Ok(()) => result.add_success(
                            action.id.clone(),
                            format!("deleted {}", action.function),
                        ),
                        Err(e) => {
                            warn!(function = %action.function, error = %e, "Delete failed");
                            result.add_failure(action.id.clone(), e.to_string());
                        }
                    }
                }
                ActionType::NoOp => {
                    debug!(function = %action.function, reason = %action.description, "Skipping");
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// `--all`: reconcile python functions, then deploy every node function
    pub async fn deploy_all(&mut self, local: &FunctionSet) -> Result<(Plan, ApplyResult)> {
        let plan = self.plan(local).await?;
        info!(summary = %plan.summary(), "Planned reconciliation");

        let plan = self.confirm_orphans(plan)?;
        let mut result = self.apply(&plan, local).await;

        let start = Instant::now();
        let mut node = ApplyResult::new();
        match self.provider.deploy_node(None).await {
            Ok(()) => node.add_success(
                "deploy-node-functions".to_string(),
                "deployed node functions".to_string(),
            ),
            Err(e) => node.add_failure("deploy-node-functions".to_string(), e.to_string()),
        }
        node.duration_ms = start.elapsed().as_millis() as u64;
        result.merge(node);

        Ok((plan, result))
    }

    /// `--only NAME`: a local python function, otherwise a node function
    pub async fn deploy_one(&mut self, local: &FunctionSet, name: &str) -> Result<()> {
        match local.get(name) {
            Some(function) => self.deploy_function(function).await,
            None => {
                info!(function = %name, "Not declared locally, deploying as node function");
                self.provider.deploy_node(Some(name)).await
            }
        }
    }

    /// `--delete NAME`
    pub async fn delete_one(&mut self, local: &FunctionSet, name: &str) -> Result<DeleteOutcome> {
        let remote = self.provider.list_deployed().await?;

        if remote.contains_python(name) {
            info!(function = %name, "Deleting function");
            match self.provider.delete(name).await {
                Ok(()) => Ok(DeleteOutcome::Deleted),
                Err(e) => {
                    warn!(function = %name, error = %e, "Delete failed");
                    Ok(DeleteOutcome::Failed(e.to_string()))
                }
            }
        } else if local.contains(name) {
            Ok(DeleteOutcome::AlreadyDeleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    /// Deploy one local python function
    pub async fn deploy_function(&mut self, function: &FunctionDescriptor) -> Result<()> {
        if !function.trigger.is_deployable() {
            return Err(CloudError::NotDeployable {
                name: function.name.clone(),
                trigger: function.trigger.to_string(),
            });
        }

        let mut request = DeployRequest::new(&function.name, function.trigger);
        if function.trigger.is_firestore() {
            request = request.with_document_path(self.resolve_document_path(function)?);
        }
        if function.trigger == TriggerKind::Http {
            request = request.with_env_vars_file(self.options.env_vars_file.clone());
        }

        info!(function = %function.name, trigger = %function.trigger, "Deploying function");
        self.provider.deploy(&request).await
    }

    /// Document path for a Firestore trigger
    ///
    /// A manifest declaration wins, then the registry. Otherwise the user is
    /// asked once and the answer is stored in the registry.
    pub fn resolve_document_path(&mut self, function: &FunctionDescriptor) -> Result<DocumentPath> {
        if let Some(path) = &function.resource_path {
            return Ok(path.clone());
        }
        if let Some(path) = self.registry.get(&function.name) {
            debug!(function = %function.name, path = %path, "Using cached document path");
            return Ok(path);
        }

        let default = self.options.default_document_path.clone();
        let question = format!("Use default document path of {} [Y/n]: ", default);
        let path = if self.prompter.confirm(&question, true)? {
            default
        } else {
            self.ask_document_path()?
        };

        self.registry.set(&function.name, &path)?;
        info!(function = %function.name, path = %path, "Saved document path");
        Ok(path)
    }

    fn ask_document_path(&mut self) -> Result<DocumentPath> {
        let mut message = "Specify Document Path: ".to_string();
        loop {
            let answer = self.prompter.input(&message)?;
            match DocumentPath::parse(&answer) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    warn!(error = %e, "Invalid document path");
                    message = format!("{}. Specify Document Path: ", e);
                }
            }
        }
    }
}
