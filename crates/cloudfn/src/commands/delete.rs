use cloudfn_cloud::{DeleteOutcome, FunctionsProvider, Prompter, Reconciler};
use cloudfn_core::Project;
use colored::Colorize;

pub async fn handle<P, Q>(
    reconciler: &mut Reconciler<'_, P, Q>,
    project: &Project,
    name: &str,
) -> anyhow::Result<()>
where
    P: FunctionsProvider + ?Sized,
    Q: Prompter + ?Sized,
{
    match reconciler.delete_one(&project.functions, name).await? {
        DeleteOutcome::Deleted => {
            println!("  ✓ {}", format!("Deleted {}", name).green());
        }
        DeleteOutcome::AlreadyDeleted => {
            println!("{}", "Function already deleted from cloud".yellow());
            println!(
                "Remove the definition of {} from {}",
                name.cyan(),
                project.source_name()
            );
        }
        DeleteOutcome::NotFound => {
            println!(
                "{}",
                format!(
                    "Function {} is neither deployed as a python function nor defined in {}",
                    name,
                    project.source_name()
                )
                .yellow()
            );
        }
        DeleteOutcome::Failed(error) => {
            println!("  ✗ {} {}", format!("Deleting {} failed:", name).red(), error);
            anyhow::bail!("Deleting {} failed", name);
        }
    }
    Ok(())
}
