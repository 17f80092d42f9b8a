//! Plan permissions
//!
//! Permissions are published as a separate document after the plan itself.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use super::Validate;
use super::errors::ValidationError;
use super::types::validate_key;
use serde::{Deserialize, Serialize};

/// A permission on a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// See the plan and its results
    View,
    /// Change the plan configuration
    Edit,
    /// Trigger builds
    Build,
    /// Clone the plan
    Clone,
    /// Administer the plan
    Admin,
}

impl Permission {
    /// Every permission, in ascending order of power
    pub const ALL: [Self; 5] = [Self::View, Self::Edit, Self::Build, Self::Clone, Self::Admin];
}

/// Permissions granted to one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPermission {
    /// Group name
    pub group: String,
    /// Granted permissions
    pub permissions: Vec<Permission>,
}

/// Permission document for a single plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPermissions {
    /// Key of the owning project
    pub project_key: String,
    /// Key of the plan
    pub plan_key: String,
    /// Group grants
    #[serde(default)]
    pub groups: Vec<GroupPermission>,
    /// Permissions of every logged in user
    #[serde(default)]
    pub logged_in: Vec<Permission>,
    /// Anonymous users may view the plan
    #[serde(default)]
    pub anonymous_view: bool,
}

impl PlanPermissions {
    /// Creates an empty permission set for `project_key-plan_key`
    pub fn new(project_key: impl Into<String>, plan_key: impl Into<String>) -> Self {
        Self {
            project_key: project_key.into(),
            plan_key: plan_key.into(),
            groups: Vec::new(),
            logged_in: Vec::new(),
            anonymous_view: false,
        }
    }

    /// Grants `permissions` to `group`
    pub fn group(mut self, group: impl Into<String>, permissions: &[Permission]) -> Self {
        self.groups.push(GroupPermission {
            group: group.into(),
            permissions: permissions.to_vec(),
        });
        self
    }

    /// Grants `permissions` to every logged in user
    pub fn logged_in(mut self, permissions: &[Permission]) -> Self {
        self.logged_in = permissions.to_vec();
        self
    }

    /// Allows anonymous users to view the plan
    pub fn anonymous_view(mut self) -> Self {
        self.anonymous_view = true;
        self
    }

    /// Full plan key, `PROJECT-PLAN`
    pub fn plan_identifier(&self) -> String {
        format!("{}-{}", self.project_key, self.plan_key)
    }
}

impl Validate for PlanPermissions {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        validate_key(&self.project_key)?;
        validate_key(&self.plan_key)?;
        for grant in &self.groups {
            if grant.group.trim().is_empty() {
                return Err(ValidationError::EmptyName);
            }
        }
        Ok(())
    }
}
