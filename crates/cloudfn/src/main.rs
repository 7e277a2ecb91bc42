mod commands;
mod utils;

use anyhow::Context;
use clap::Parser;
use cloudfn_cloud::{Prompter, ReconcileOptions, Reconciler, StdinPrompter};
use cloudfn_cloud_gcp::{EnvironmentResolver, Gcloud, GcpProvider};
use cloudfn_config::{DOC_PATH_FILE, DocPathRegistry, ENV_FILE, EnvFile, Variables};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cloudfn")]
#[command(version)]
#[command(about = "Deploy Google Cloud Functions", long_about = None)]
struct Cli {
    /// Name of the function to deploy
    #[arg(long, value_name = "NAME", conflicts_with = "all")]
    only: Option<String>,

    /// Deploy all functions and offer to delete orphaned ones
    #[arg(long)]
    all: bool,

    /// Use defaults instead of asking
    #[arg(long)]
    yes: bool,

    /// Delete a python cloud function
    #[arg(long, value_name = "NAME")]
    delete: Option<String>,

    /// Deploy HTTP functions with the env vars file (.env.yaml)
    #[arg(long)]
    env: bool,

    /// Functions directory (defaults to the nearest directory with functions.kdl or main.py)
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if std::env::var_os("VIRTUAL_ENV").is_some() {
        println!("{}", "Using Virtualenv".dimmed());
    } else {
        println!("{}", "Not using Virtualenv".dimmed());
    }

    let project_root = match &cli.project_dir {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("Project directory not found: {}", dir.display()))?,
        None => cloudfn_core::find_project_root()?.canonicalize()?,
    };

    let project = cloudfn_core::load_project(&project_root)?;
    println!(
        "Getting cloud functions defined in {}",
        project.source_name().cyan()
    );
    utils::print_functions(&project);

    let env_vars_file = if cli.env {
        let vars = cloudfn_config::load_env_vars_file(project.env_vars_path())?;
        tracing::debug!(count = vars.len(), "Validated env vars file");
        Some(project.settings.env_vars_file.clone())
    } else {
        None
    };

    let mut variables = Variables::from_process(EnvFile::load(project_root.join(ENV_FILE))?);
    let mut prompter = StdinPrompter::new(cli.yes);

    let gcloud = Gcloud::new(&project_root);
    let environment = EnvironmentResolver::new(&project_root, &mut variables, &mut prompter)
        .setup(&gcloud)
        .await?;
    println!("Project: {}", environment.project_id.cyan());

    let provider =
        GcpProvider::for_environment(&project_root, &environment, &project.settings.runtime);

    let mut name = cli.only.clone();
    if name.is_none() && !cli.all && cli.delete.is_none() {
        let answer = prompter.input("Please enter function name: ")?;
        if answer.is_empty() {
            anyhow::bail!("No function name given");
        }
        name = Some(answer);
    }

    utils::print_auth_status(&provider).await;

    let mut registry = DocPathRegistry::load(project_root.join(DOC_PATH_FILE))?;
    let options = ReconcileOptions {
        default_document_path: project.settings.default_document_path.clone(),
        env_vars_file,
        source_name: project.source_name(),
    };
    let mut reconciler = Reconciler::new(&provider, &mut prompter, &mut registry, options);

    // a failed delete is reported at the end, after the deploys
    let deleted = match &cli.delete {
        Some(target) => commands::delete::handle(&mut reconciler, &project, target).await,
        None => Ok(()),
    };
    if let Err(e) = &deleted {
        tracing::warn!(error = %e, "Continuing after failed delete");
    }

    if cli.all {
        commands::all::handle(&mut reconciler, &project).await?;
    } else if let Some(target) = &name {
        commands::only::handle(&mut reconciler, &project, target).await?;
    }

    deleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["cloudfn", "--only", "hello", "--env", "--yes"]).unwrap();
        assert_eq!(cli.only.as_deref(), Some("hello"));
        assert!(cli.env);
        assert!(cli.yes);
        assert!(!cli.all);

        let cli = Cli::try_parse_from(["cloudfn", "--all", "--delete", "old"]).unwrap();
        assert!(cli.all);
        assert_eq!(cli.delete.as_deref(), Some("old"));
    }

    #[test]
    fn test_only_conflicts_with_all() {
        assert!(Cli::try_parse_from(["cloudfn", "--only", "hello", "--all"]).is_err());
    }
}
