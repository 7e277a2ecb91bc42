//! cloudfn provider abstraction
//!
//! Plans and applies function deployments against a functions provider.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  cloudfn CLI                     │
//! │          (--all / --only / --delete)             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                cloudfn-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │          Provider Abstraction             │   │
//! │  │  trait FunctionsProvider { ... }          │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Reconciler  │  │   Prompter   │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │ gcloud and    │
//! │ firebase CLIs │
//! └───────────────┘
//! ```

pub mod action;
pub mod error;
pub mod prompt;
pub mod provider;
pub mod reconcile;

// Re-exports
pub use action::{Action, ActionResult, ActionType, ApplyResult, Plan, PlanSummary};
pub use error::{CloudError, Result};
pub use prompt::{Prompter, StdinPrompter};
#[cfg(any(test, feature = "testing"))]
pub use prompt::ScriptedPrompter;
pub use provider::{
    AuthStatus, DeployRequest, DeployedFunction, DeployedFunctions, FunctionsProvider,
    RuntimeFamily,
};
pub use reconcile::{DeleteOutcome, ReconcileOptions, Reconciler};
