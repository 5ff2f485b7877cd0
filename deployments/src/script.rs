use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, instrument};

use crate::environment::DeploymentEnvironment;

/// A deploy script, selected for a run by its tags.
#[async_trait]
pub trait DeployFunction: Send + Sync {
    fn id(&self) -> &'static str;

    fn tags(&self) -> &'static [&'static str];

    async fn run(&self, env: &dyn DeploymentEnvironment) -> Result<()>;
}

fn selected(script: &dyn DeployFunction, tags: &[String]) -> bool {
    tags.is_empty()
        || script
            .tags()
            .iter()
            .any(|t| tags.iter().any(|wanted| wanted == t))
}

/// Runs the scripts matching `tags` (all of them when `tags` is empty) in
/// order, stopping at the first failure. Returns the ids of the scripts run.
#[instrument(skip_all, level = "info")]
pub async fn run_deploy_scripts(
    scripts: &[Box<dyn DeployFunction>],
    tags: &[String],
    env: &dyn DeploymentEnvironment,
) -> Result<Vec<&'static str>> {
    let mut executed = vec![];
    for script in scripts.iter().filter(|s| selected(s.as_ref(), tags)) {
        info!("Running deploy script {}", script.id());
        script
            .run(env)
            .await
            .with_context(|| format!("deploy script `{}` failed", script.id()))?;
        executed.push(script.id());
    }
    Ok(executed)
}
