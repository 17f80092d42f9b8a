//! `nightly-plan render` - Print the documents that would be published

use anyhow::{Context, Result};
use nightly_plan::infrastructure::YamlBackend;
use nightly_plan::nightly::NightlyPlan;
use nightly_plan::plan::{Plan, PlanPermissions};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    /// Server import documents, plan then permissions
    Yaml,
    /// The plan model itself
    Json,
}

pub fn render_nightly(generator: &NightlyPlan, format: RenderFormat) -> Result<String> {
    let plan = generator.create_plan().context("Failed to build plan")?;
    let permissions = generator.default_permissions();
    render_documents(&plan, &permissions, format)
}

pub fn render_documents(plan: &Plan, permissions: &PlanPermissions, format: RenderFormat) -> Result<String> {
    match format {
        RenderFormat::Yaml => {
            let backend = YamlBackend::new();
            let plan_doc = backend.translate(plan).context("Failed to render plan")?;
            let permissions_doc = backend
                .translate_permissions(permissions)
                .context("Failed to render permissions")?;
            Ok(format!("{plan_doc}---\n{permissions_doc}"))
        }
        RenderFormat::Json => {
            let document = serde_json::json!({
                "plan": plan,
                "permissions": permissions,
            });
            let mut json = serde_json::to_string_pretty(&document).context("Failed to render JSON")?;
            json.push('\n');
            Ok(json)
        }
    }
}

pub fn save_render(rendered: &str, output_path: &Path) -> Result<()> {
    fs::write(output_path, rendered)
        .with_context(|| format!("Failed to write documents to: {}", output_path.display()))?;
    tracing::info!(path = %output_path.display(), "wrote rendered documents");
    Ok(())
}
