//! Plan server client
//!
//! Publishes rendered plan and permission documents over HTTP.

use super::credentials::Credentials;
use super::yaml::YamlBackend;
use crate::plan::{Plan, PlanError, PlanPermissions, Validate};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Import endpoint for plans, relative to the server URL
pub const PLAN_IMPORT_PATH: &str = "rest/api/latest/import/plan";
/// Import endpoint for plan permissions, relative to the server URL
pub const PERMISSIONS_IMPORT_PATH: &str = "rest/api/latest/import/plan-permissions";

/// Destination of generated plans
#[async_trait]
#[allow(clippy::missing_errors_doc)]
pub trait PlanPublisher: Send + Sync {
    /// Publishes a plan definition
    async fn publish_plan(&self, plan: &Plan) -> Result<(), PlanError>;

    /// Publishes the permissions of a plan
    async fn publish_permissions(&self, permissions: &PlanPermissions) -> Result<(), PlanError>;
}

/// Publishes the plan, then its permissions
///
/// Both documents are validated first. Nothing is retried: when the plan is
/// rejected the permissions are not sent.
///
/// # Errors
///
/// Returns the validation error, or the first error reported by `publisher`.
pub async fn publish(
    publisher: &dyn PlanPublisher,
    plan: &Plan,
    permissions: &PlanPermissions,
) -> Result<(), PlanError> {
    plan.validate()?;
    permissions.validate()?;

    publisher.publish_plan(plan).await?;
    tracing::info!(plan = %plan.identifier(), "published plan");

    publisher.publish_permissions(permissions).await?;
    tracing::info!(plan = %permissions.plan_identifier(), "published plan permissions");
    Ok(())
}

/// HTTP client of the plan server
#[derive(Debug, Clone)]
pub struct BambooServer {
    base: Url,
    credentials: Credentials,
    client: reqwest::Client,
    backend: YamlBackend,
}

impl BambooServer {
    /// Creates a client for the server at `base`
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Http`] if the HTTP client cannot be built.
    pub fn new(base: Url, credentials: Credentials, timeout: Duration) -> Result<Self, PlanError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nightly-plan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base: with_trailing_slash(base),
            credentials,
            client,
            backend: YamlBackend::new(),
        })
    }

    /// Absolute URL of an endpoint below the server URL
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Http`] if `path` cannot be joined to the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, PlanError> {
        self.base
            .join(path)
            .map_err(|e| PlanError::Http(format!("invalid endpoint '{path}': {e}")))
    }

    async fn post_yaml(&self, path: &str, body: String) -> Result<(), PlanError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, bytes = body.len(), "posting document");

        let response = self
            .client
            .post(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(reqwest::header::CONTENT_TYPE, "application/yaml")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "server rejected document");
        Err(PlanError::Publish {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PlanPublisher for BambooServer {
    async fn publish_plan(&self, plan: &Plan) -> Result<(), PlanError> {
        let document = self.backend.translate(plan)?;
        self.post_yaml(PLAN_IMPORT_PATH, document).await
    }

    async fn publish_permissions(&self, permissions: &PlanPermissions) -> Result<(), PlanError> {
        let document = self.backend.translate_permissions(permissions)?;
        self.post_yaml(PERMISSIONS_IMPORT_PATH, document).await
    }
}

/// Publisher that renders documents and logs them instead of sending
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunPublisher {
    backend: YamlBackend,
}

impl DryRunPublisher {
    /// Creates a dry run publisher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanPublisher for DryRunPublisher {
    async fn publish_plan(&self, plan: &Plan) -> Result<(), PlanError> {
        let document = self.backend.translate(plan)?;
        tracing::info!(plan = %plan.identifier(), bytes = document.len(), "dry run: plan not sent");
        Ok(())
    }

    async fn publish_permissions(&self, permissions: &PlanPermissions) -> Result<(), PlanError> {
        let document = self.backend.translate_permissions(permissions)?;
        tracing::info!(
            plan = %permissions.plan_identifier(),
            bytes = document.len(),
            "dry run: permissions not sent"
        );
        Ok(())
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
