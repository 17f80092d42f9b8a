//! Plan definition and builder

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use crate::plan::errors::ValidationError;
use crate::plan::options::{
    Notification, PlanBranchManagement, PluginConfiguration, Trigger, Variable,
};
use crate::plan::stage::Stage;
use crate::plan::types::{Validate, validate_key, validate_name};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top level sections of the rendered plan document
///
/// Jobs are rendered as top level entries named after the job, so these
/// names are not available to jobs.
pub const RESERVED_JOB_NAMES: [&str; 11] = [
    "version",
    "plan",
    "stages",
    "repositories",
    "triggers",
    "variables",
    "branches",
    "notifications",
    "other",
    "labels",
    "dependencies",
];

/// Project owning one or more plans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,
    /// Project key
    pub key: String,
}

impl Project {
    /// Creates a project
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

impl Validate for Project {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        validate_name(&self.name)?;
        validate_key(&self.key)
    }
}

/// Main plan structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Owning project
    pub project: Project,

    /// Plan name
    pub name: String,

    /// Plan key
    pub key: String,

    /// Plan description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Stages in plan
    pub stages: Vec<Stage>,

    /// Names of linked repositories, the first is the default repository
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub linked_repositories: Vec<String>,

    /// Plan triggers
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub triggers: Vec<Trigger>,

    /// Plan variables
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub variables: Vec<Variable>,

    /// Branch management
    #[serde(default)]
    pub branch_management: PlanBranchManagement,

    /// Notifications
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notifications: Vec<Notification>,

    /// Server plugin configuration
    #[serde(default)]
    pub plugins: PluginConfiguration,
}

impl Validate for Plan {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        self.project.validate()?;
        validate_name(&self.name)?;
        validate_key(&self.key)?;

        if self.stages.is_empty() {
            return Err(ValidationError::EmptyPlan);
        }

        let mut keys = ahash::AHashSet::with_capacity(self.job_count());
        let mut names = ahash::AHashSet::with_capacity(self.job_count());
        for stage in &self.stages {
            stage.validate()?;
            for job in &stage.jobs {
                if RESERVED_JOB_NAMES.contains(&job.name.as_str()) {
                    return Err(ValidationError::ReservedJobName {
                        name: job.name.clone(),
                    });
                }
                if !keys.insert(job.key.as_str()) {
                    return Err(ValidationError::DuplicateJobKey {
                        key: job.key.clone(),
                        stage: stage.name.clone(),
                    });
                }
                if !names.insert(job.name.as_str()) {
                    return Err(ValidationError::DuplicateJobName {
                        name: job.name.clone(),
                        stage: stage.name.clone(),
                    });
                }
            }
        }

        for trigger in &self.triggers {
            trigger.validate()?;
        }

        for notification in &self.notifications {
            notification.validate()?;
        }

        Ok(())
    }
}

impl Plan {
    /// Creates a new plan builder
    pub fn builder(
        project: Project,
        name: impl Into<String>,
        key: impl Into<String>,
    ) -> PlanBuilder {
        PlanBuilder::new(project, name, key)
    }

    /// Full plan key, `PROJECT-PLAN`
    pub fn identifier(&self) -> String {
        format!("{}-{}", self.project.key, self.key)
    }

    /// Returns number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Returns number of jobs across all stages
    pub fn job_count(&self) -> usize {
        self.stages.iter().map(Stage::job_count).sum()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Plan({}): {} stages, {} jobs",
            self.identifier(),
            self.stages.len(),
            self.job_count()
        )
    }
}

/// Builder for creating plans
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    plan: Plan,
}

impl PlanBuilder {
    /// Creates a new plan builder
    pub fn new(project: Project, name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            plan: Plan {
                project,
                name: name.into(),
                key: key.into(),
                description: None,
                stages: Vec::new(),
                linked_repositories: Vec::new(),
                triggers: Vec::new(),
                variables: Vec::new(),
                branch_management: PlanBranchManagement::default(),
                notifications: Vec::new(),
                plugins: PluginConfiguration::default(),
            },
        }
    }

    /// Sets plan description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.plan.description = Some(description.into());
        self
    }

    /// Adds a stage to plan
    pub fn stage(mut self, stage: Stage) -> Self {
        self.plan.stages.push(stage);
        self
    }

    /// Adds multiple stages to plan
    pub fn stages(mut self, stages: impl IntoIterator<Item = Stage>) -> Self {
        self.plan.stages.extend(stages);
        self
    }

    /// Links a repository by name
    pub fn linked_repository(mut self, name: impl Into<String>) -> Self {
        self.plan.linked_repositories.push(name.into());
        self
    }

    /// Adds a trigger to plan
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.plan.triggers.push(trigger);
        self
    }

    /// Adds a variable to plan
    pub fn variable(mut self, variable: Variable) -> Self {
        self.plan.variables.push(variable);
        self
    }

    /// Sets branch management
    pub fn branch_management(mut self, management: PlanBranchManagement) -> Self {
        self.plan.branch_management = management;
        self
    }

    /// Adds a notification
    pub fn notification(mut self, notification: Notification) -> Self {
        self.plan.notifications.push(notification);
        self
    }

    /// Sets plugin configuration
    pub fn plugins(mut self, plugins: PluginConfiguration) -> Self {
        self.plan.plugins = plugins;
        self
    }

    /// Builds plan
    #[allow(clippy::missing_errors_doc)]
    pub fn build(self) -> Result<Plan, ValidationError> {
        self.plan.validate()?;
        Ok(self.plan)
    }

    /// Builds plan without validation (for internal use)
    #[must_use]
    pub fn build_unchecked(self) -> Plan {
        self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Job, Task};

    fn project() -> Project {
        Project::new("TYPO3 Core", "CORE")
    }

    fn job(key: &str) -> Job {
        Job::new(format!("Job {key}"), key).with_tasks([Task::checkout()])
    }

    #[test]
    fn test_plan_builder() {
        let plan = Plan::builder(project(), "Core master nightly", "GTN")
            .description("nightly")
            .stage(Stage::new("Preparation", vec![job("CLFB")]))
            .stages([Stage::new("Jobs 1 - 50", vec![job("A"), job("B")])])
            .linked_repository("github TYPO3 TYPO3.CMS")
            .trigger(Trigger::scheduled("Scheduled", "0 0 3 ? * *"))
            .variable(Variable::new("patchset", ""))
            .build()
            .unwrap();

        assert_eq!(plan.identifier(), "CORE-GTN");
        assert_eq!(plan.stage_count(), 2);
        assert_eq!(plan.job_count(), 3);
        assert_eq!(plan.to_string(), "Plan(CORE-GTN): 2 stages, 3 jobs");
    }

    #[test]
    fn test_plan_without_stages() {
        let result = Plan::builder(project(), "Empty", "EMPTY").build();
        assert_eq!(result, Err(ValidationError::EmptyPlan));
    }

    #[test]
    fn test_plan_duplicate_job_key() {
        let result = Plan::builder(project(), "Dup", "DUP")
            .stage(Stage::new("One", vec![job("A")]))
            .stage(Stage::new("Two", vec![job("A")]))
            .build();

        assert_eq!(
            result,
            Err(ValidationError::DuplicateJobKey {
                key: "A".to_string(),
                stage: "Two".to_string(),
            })
        );
    }

    #[test]
    fn test_plan_duplicate_job_name() {
        let result = Plan::builder(project(), "Dup", "DUP")
            .stage(Stage::new(
                "One",
                vec![
                    Job::new("Lint", "AAA").with_tasks([Task::checkout()]),
                    Job::new("Lint", "BBB").with_tasks([Task::checkout()]),
                ],
            ))
            .build();

        assert_eq!(
            result,
            Err(ValidationError::DuplicateJobName {
                name: "Lint".to_string(),
                stage: "One".to_string(),
            })
        );
    }

    #[test]
    fn test_plan_reserved_job_name() {
        for name in RESERVED_JOB_NAMES {
            let result = Plan::builder(project(), "Plan", "PLAN")
                .stage(Stage::new(
                    "One",
                    vec![Job::new(name, "CCC").with_tasks([Task::checkout()])],
                ))
                .build();

            assert_eq!(
                result,
                Err(ValidationError::ReservedJobName {
                    name: name.to_string(),
                })
            );
        }
    }

    #[test]
    fn test_plan_empty_stage() {
        let result = Plan::builder(project(), "Plan", "PLAN")
            .stage(Stage::new("One", vec![job("A")]))
            .stage(Stage::new("X", vec![]))
            .build();
        assert!(matches!(result, Err(ValidationError::EmptyStage { .. })));
    }

    #[test]
    fn test_plan_invalid_project_key() {
        let result = Plan::builder(Project::new("Core", "co re"), "Plan", "PLAN")
            .stage(Stage::new("One", vec![job("A")]))
            .build();
        assert!(matches!(result, Err(ValidationError::InvalidKey { .. })));
    }

    #[test]
    fn test_plan_invalid_trigger() {
        let result = Plan::builder(project(), "Plan", "PLAN")
            .stage(Stage::new("One", vec![job("A")]))
            .trigger(Trigger::scheduled("Scheduled", "nightly"))
            .build();
        assert!(matches!(
            result,
            Err(ValidationError::InvalidCronExpression(_))
        ));
    }
}
