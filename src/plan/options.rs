//! Plan options, triggers and notifications
//!
//! This module defines everything attached to a plan besides its stages:
//! triggers, variables, branch management, notifications and plugin
//! configuration.

use super::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Triggers for plan execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Quartz cron schedule trigger
    Scheduled {
        /// Trigger name
        name: String,
        /// Human readable description
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// Quartz cron expression (seconds first)
        cron: String,
    },
}

impl Trigger {
    /// Creates a scheduled trigger
    pub fn scheduled(name: impl Into<String>, cron: impl Into<String>) -> Self {
        Self::Scheduled {
            name: name.into(),
            description: None,
            cron: cron.into(),
        }
    }

    /// Sets the description
    #[must_use]
    pub fn with_description(self, text: impl Into<String>) -> Self {
        match self {
            Self::Scheduled { name, cron, .. } => Self::Scheduled {
                name,
                description: Some(text.into()),
                cron,
            },
        }
    }
}

impl super::Validate for Trigger {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        match self {
            Self::Scheduled { name, cron, .. } => {
                super::types::validate_name(name)?;
                if cron.trim().is_empty() {
                    return Err(ValidationError::InvalidCronExpression(
                        "Cron expression cannot be empty".to_string(),
                    ));
                }
                // Quartz: seconds minutes hours day-of-month month day-of-week [year]
                let parts = cron.split_whitespace().count();
                if parts != 6 && parts != 7 {
                    return Err(ValidationError::InvalidCronExpression(cron.clone()));
                }
                Ok(())
            }
        }
    }
}

/// A plan variable, overridable when a build is started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name
    pub name: String,
    /// Default value
    pub value: String,
}

impl Variable {
    /// Creates a variable
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// When plan branches are created automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BranchCreation {
    /// Branches are only created by hand
    #[default]
    Manually,
    /// A branch is created for every new repository branch
    ForNewBranch,
}

/// Removal rules for plan branches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCleanup {
    /// Days after the repository branch was deleted
    pub after_deleted_days: u32,
    /// Days of inactivity before removal
    pub after_inactive_days: u32,
}

impl Default for BranchCleanup {
    fn default() -> Self {
        Self {
            after_deleted_days: 7,
            after_inactive_days: 30,
        }
    }
}

/// Branch management of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanBranchManagement {
    /// Creation policy
    pub create: BranchCreation,
    /// Cleanup policy, `None` keeps branches forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<BranchCleanup>,
    /// Notify committers of branch builds
    #[serde(default)]
    pub notify_committers: bool,
}

impl PlanBranchManagement {
    /// Creates branch management with manual creation and no cleanup
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes branches following `cleanup`
    #[must_use]
    pub fn delete(mut self, cleanup: BranchCleanup) -> Self {
        self.delete = Some(cleanup);
        self
    }

    /// Notifies committers of branch builds
    #[must_use]
    pub fn notification_for_committers(mut self) -> Self {
        self.notify_committers = true;
        self
    }
}

/// Events a notification fires on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationEvent {
    /// Every finished build
    PlanCompleted,
    /// Failed builds only
    PlanFailed,
}

/// Recipient handled by a server plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecipient {
    /// Plugin module key, `vendor.plugin:module`
    pub plugin: String,
    /// Plugin specific recipient configuration
    pub recipient: String,
}

/// Notification sent on plan events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Event triggering the notification
    pub event: NotificationEvent,
    /// Recipients
    pub recipients: Vec<NotificationRecipient>,
}

impl Notification {
    /// Creates a notification without recipients
    #[must_use]
    pub fn new(event: NotificationEvent) -> Self {
        Self {
            event,
            recipients: Vec::new(),
        }
    }

    /// Adds a plugin recipient
    #[must_use]
    pub fn recipient(mut self, plugin: impl Into<String>, recipient: impl Into<String>) -> Self {
        self.recipients.push(NotificationRecipient {
            plugin: plugin.into(),
            recipient: recipient.into(),
        });
        self
    }
}

impl super::Validate for Notification {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.recipients.is_empty() {
            return Err(ValidationError::InvalidRecipient(
                "notification has no recipients".to_string(),
            ));
        }
        for recipient in &self.recipients {
            if !recipient.plugin.contains(':') {
                return Err(ValidationError::InvalidRecipient(format!(
                    "plugin key '{}' is not a module key",
                    recipient.plugin
                )));
            }
        }
        Ok(())
    }
}

/// Build expiry configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildExpiry {
    /// Expire results older than this many days
    pub duration_days: u32,
    /// Always keep this many most recent builds
    pub builds_to_keep: u32,
    /// Expire artifacts too
    pub expire_artifacts: bool,
    /// Expire build logs too
    pub expire_logs: bool,
}

impl BuildExpiry {
    /// Creates build expiry after `days` keeping `keep` builds
    #[must_use]
    pub fn new(days: u32, keep: u32) -> Self {
        Self {
            duration_days: days,
            builds_to_keep: keep,
            expire_artifacts: true,
            expire_logs: true,
        }
    }
}

/// Server plugin configuration of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PluginConfiguration {
    /// Build expiry, `None` uses the server default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_expiry: Option<BuildExpiry>,

    /// Maximum concurrent builds, `None` uses the server default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrent_builds: Option<u32>,
}

impl PluginConfiguration {
    /// Creates an empty plugin configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets build expiry
    #[must_use]
    pub fn with_build_expiry(mut self, expiry: BuildExpiry) -> Self {
        self.build_expiry = Some(expiry);
        self
    }

    /// Sets maximum concurrent builds
    #[must_use]
    pub fn with_concurrent_builds(mut self, builds: u32) -> Self {
        self.concurrent_builds = Some(builds);
        self
    }
}
