//! Google Cloud Functions provider for cloudfn
//!
//! This crate implements the FunctionsProvider trait on top of the `gcloud`
//! and `firebase` command-line tools.
//!
//! # Features
//!
//! - Python function deploys for HTTP, Cloud Storage and Firestore triggers
//! - Node function deploys through `firebase deploy`
//! - Account and project resolution cached in `.env`
//!
//! # Requirements
//!
//! - `gcloud` CLI must be installed (Google Cloud SDK)
//! - `firebase` CLI must be installed for node functions
//! - In CI (`CI_CD` set): `GCLOUD` holds the service account key JSON and
//!   `FIREBASE_TOKEN` the firebase token
//!
//! # Example
//!
//! ```ignore
//! use cloudfn_cloud_gcp::{EnvironmentResolver, Gcloud, GcpProvider};
//! use cloudfn_cloud::FunctionsProvider;
//!
//! let gcloud = Gcloud::new(&root);
//! let environment = EnvironmentResolver::new(&root, &mut variables, &mut prompter)
//!     .setup(&gcloud)
//!     .await?;
//!
//! let provider = GcpProvider::for_environment(&root, &environment, "python37");
//! let deployed = provider.list_deployed().await?;
//! ```

pub mod environment;
pub mod error;
pub mod firebase;
pub mod gcloud;
pub mod provider;

pub use environment::{CI_CD_KEY_FILE, DeploymentEnvironment, EnvironmentResolver, parse_access};
pub use error::{GcpError, Result};
pub use firebase::Firebase;
pub use gcloud::Gcloud;
pub use provider::GcpProvider;
