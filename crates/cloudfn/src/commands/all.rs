use crate::utils;
use cloudfn_cloud::{ActionType, FunctionsProvider, Prompter, Reconciler};
use cloudfn_core::Project;
use colored::Colorize;

pub async fn handle<P, Q>(reconciler: &mut Reconciler<'_, P, Q>, project: &Project) -> anyhow::Result<()>
where
    P: FunctionsProvider + ?Sized,
    Q: Prompter + ?Sized,
{
    println!("{}", "Getting current deployed functions".blue());
    let (plan, result) = reconciler.deploy_all(&project.functions).await?;

    println!();
    println!("{}", format!("Plan: {}", plan.summary()).bold());
    if !plan.has_changes {
        println!("  {}", "No python function changes".dimmed());
    }
    for action in &plan.actions {
        let marker = match action.action_type {
            ActionType::Create => "+".green(),
            ActionType::Update => "~".yellow(),
            ActionType::Delete => "-".red(),
            ActionType::NoOp => "=".dimmed(),
        };
        println!("  {} {}", marker, action.description);
    }

    utils::report(&result)
}
