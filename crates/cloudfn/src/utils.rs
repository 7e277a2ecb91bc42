use cloudfn_cloud::{ApplyResult, FunctionsProvider};
use cloudfn_core::{DeclarationSource, Project, TriggerKind};
use colored::Colorize;

/// List the functions found in the project with their trigger kinds
pub fn print_functions(project: &Project) {
    if project.functions.is_empty() {
        println!("  {}", "(no cloud functions found)".dimmed());
        return;
    }

    for function in project.functions.iter() {
        let trigger = match function.trigger {
            TriggerKind::Unknown => function.trigger.to_string().yellow(),
            _ => function.trigger.to_string().normal(),
        };
        let declared = match function.source {
            DeclarationSource::Manifest => " (functions.kdl)",
            DeclarationSource::Heuristic => "",
        };
        match &function.resource_path {
            Some(path) => println!(
                "  • {} [{}] {}{}",
                function.name.cyan(),
                trigger,
                path,
                declared.dimmed()
            ),
            None => println!(
                "  • {} [{}]{}",
                function.name.cyan(),
                trigger,
                declared.dimmed()
            ),
        }
    }

    let http = project.functions.by_trigger(TriggerKind::Http).len();
    let storage = project.functions.by_trigger(TriggerKind::Storage).len();
    let firestore = project.functions.firestore().len();
    let unknown = project.functions.by_trigger(TriggerKind::Unknown).len();
    println!(
        "  {}",
        format!(
            "{} http, {} storage, {} firestore, {} unknown",
            http, storage, firestore, unknown
        )
        .dimmed()
    );
}

pub async fn print_auth_status<P: FunctionsProvider + ?Sized>(provider: &P) {
    match provider.check_auth().await {
        Ok(status) if status.authenticated => {
            let account = status.account_info.unwrap_or_default();
            tracing::info!(provider = provider.name(), account = %account, "Authenticated");
        }
        Ok(status) => {
            println!(
                "  ⚠ {}: {}",
                provider.display_name(),
                status.error.unwrap_or_default().yellow()
            );
        }
        Err(e) => tracing::warn!(error = %e, "Could not check authentication"),
    }
}

/// Print per-action results; fails when any action failed
pub fn report(result: &ApplyResult) -> anyhow::Result<()> {
    println!();
    for action in &result.succeeded {
        println!("  ✓ {}", action.message.green());
    }
    for action in &result.failed {
        println!(
            "  ✗ {} {}",
            action.action_id.red(),
            action.error.as_deref().unwrap_or_default()
        );
    }

    let total = result.succeeded.len() + result.failed.len();
    println!(
        "{} ({} ms)",
        format!("{} of {} actions succeeded", result.succeeded.len(), total).bold(),
        result.duration_ms
    );

    if !result.is_success() {
        anyhow::bail!("{} of {} actions failed", result.failed.len(), total);
    }
    Ok(())
}
