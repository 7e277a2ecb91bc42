use cloudfn_cloud::{FunctionsProvider, Prompter, Reconciler};
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
    match project.functions.get(name) {
        Some(function) => println!(
            "Deploying {} ({})",
            name.cyan(),
            function.trigger.to_string().dimmed()
        ),
        None => println!(
            "{} is not defined in {}, deploying it with firebase",
            name.cyan(),
            project.source_name()
        ),
    }

    reconciler.deploy_one(&project.functions, name).await?;
    println!("  ✓ {}", format!("Deployed {}", name).green());
    Ok(())
}
