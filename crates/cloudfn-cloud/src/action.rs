//! Action types for function reconciliation

use crate::provider::DeployedFunctions;
use cloudfn_core::{FunctionSet, TriggerKind};
use serde::{Deserialize, Serialize};

/// Represents a planned action for a function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Unique identifier for the action
    pub id: String,

    /// Type of action to perform
    pub action_type: ActionType,

    /// Function name (entry point)
    pub function: String,

    /// Trigger kind of the local declaration, absent for remote-only functions
    pub trigger: Option<TriggerKind>,

    /// Description of the action
    pub description: String,
}

impl Action {
    pub fn create(function: &str, trigger: TriggerKind) -> Self {
        Self {
            id: format!("create-{}", function),
            action_type: ActionType::Create,
            function: function.to_string(),
            trigger: Some(trigger),
            description: format!("deploy new {} function {}", trigger, function),
        }
    }

    pub fn update(function: &str, trigger: TriggerKind) -> Self {
        Self {
            id: format!("update-{}", function),
            action_type: ActionType::Update,
            function: function.to_string(),
            trigger: Some(trigger),
            description: format!("redeploy {} function {}", trigger, function),
        }
    }

    pub fn delete(function: &str) -> Self {
        Self {
            id: format!("delete-{}", function),
            action_type: ActionType::Delete,
            function: function.to_string(),
            trigger: None,
            description: format!("delete {} from the cloud", function),
        }
    }

    pub fn noop(function: &str, trigger: Option<TriggerKind>, reason: impl Into<String>) -> Self {
        Self {
            id: format!("noop-{}", function),
            action_type: ActionType::NoOp,
            function: function.to_string(),
            trigger,
            description: reason.into(),
        }
    }
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Deploy a function that is not deployed yet
    Create,
    /// Redeploy an existing function
    Update,
    /// Delete a deployed function
    Delete,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of applying actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Successfully applied actions
    pub succeeded: Vec<ActionResult>,

    /// Failed actions
    pub failed: Vec<ActionResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            duration_ms: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, action_id: String, message: String) {
        self.succeeded.push(ActionResult {
            action_id,
            message,
            error: None,
        });
    }

    pub fn add_failure(&mut self, action_id: String, error: String) {
        self.failed.push(ActionResult {
            action_id,
            message: String::new(),
            error: Some(error),
        });
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ApplyResult) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
        self.duration_ms += other.duration_ms;
    }
}

impl Default for ApplyResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a single action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    /// ID of the action
    pub action_id: String,

    /// Success message
    pub message: String,

    /// Error message if failed
    pub error: Option<String>,
}

/// Plan containing all actions to be applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// List of actions to perform
    pub actions: Vec<Action>,

    /// Whether the plan has any changes
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    /// Diff the local functions against the deployed python functions
    ///
    /// Every local function is deployed (create or update). Deployed python
    /// functions without a local counterpart become delete candidates; a
    /// function present locally is never a delete candidate.
    pub fn reconcile(local: &FunctionSet, remote: &DeployedFunctions) -> Self {
        let mut actions = Vec::new();

        for function in local.iter() {
            let action = if !function.trigger.is_deployable() {
                Action::noop(
                    &function.name,
                    Some(function.trigger),
                    format!(
                        "skip {}: trigger kind could not be determined",
                        function.name
                    ),
                )
            } else if remote.contains_python(&function.name) {
                Action::update(&function.name, function.trigger)
            } else {
                Action::create(&function.name, function.trigger)
            };
            actions.push(action);
        }

        for deployed in remote.python() {
            if !local.contains(&deployed.name) {
                actions.push(Action::delete(&deployed.name));
            }
        }

        Self::new(actions)
    }

    /// Get actions by type
    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

/// Summary of planned actions
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.no_change
        )
    }
}
