//! `nightly-plan publish` - Send plan and permissions to the plan server

use anyhow::{Context, Result};
use nightly_plan::infrastructure::{
    BambooServer, Config, Credentials, DryRunPublisher, PlanPublisher, publish,
};
use nightly_plan::nightly::NightlyPlan;

pub fn publish_nightly(generator: &NightlyPlan, config: &Config, dry_run: bool) -> Result<()> {
    let plan = generator.create_plan().context("Failed to build plan")?;
    let permissions = generator.default_permissions();
    tracing::info!(
        plan = %plan.identifier(),
        stages = plan.stage_count(),
        jobs = plan.job_count(),
        "built plan"
    );

    let publisher: Box<dyn PlanPublisher> = if dry_run {
        Box::new(DryRunPublisher::new())
    } else {
        let credentials = Credentials::load(&config.credentials_file)
            .context("Failed to load plan server credentials")?;
        let server_url = config.server_url()?;
        tracing::info!(server = %server_url, user = %credentials.username, "publishing");
        Box::new(BambooServer::new(server_url, credentials, config.timeout())?)
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime
        .block_on(publish(publisher.as_ref(), &plan, &permissions))
        .with_context(|| format!("Failed to publish {}", plan.identifier()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_dry_run_needs_no_credentials() {
        let config = Config {
            credentials_file: PathBuf::from("/nonexistent/.credentials"),
            ..Config::default()
        };

        assert!(publish_nightly(&NightlyPlan::new(), &config, true).is_ok());
    }

    #[test]
    fn test_missing_credentials() {
        let config = Config {
            credentials_file: PathBuf::from("/nonexistent/.credentials"),
            ..Config::default()
        };

        let err = publish_nightly(&NightlyPlan::new(), &config, false).unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }
}
