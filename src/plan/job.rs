//! Job types for plan definition
//!
//! A job is the unit of work an agent picks up. It holds ordered tasks,
//! final tasks that always run, and the agent capabilities it requires.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use super::Validate;
use super::errors::ValidationError;
use super::task::Task;
use super::types::{validate_key, validate_name};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a requirement matches an agent capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementMatch {
    /// Capability must be present
    Exists,
    /// Capability must equal the value
    Equals(String),
}

/// Agent capability a job requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Capability key
    pub key: String,
    /// Match rule
    pub matcher: RequirementMatch,
}

impl Requirement {
    /// Requires the capability to exist on the agent
    pub fn exists(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            matcher: RequirementMatch::Exists,
        }
    }

    /// Requires the capability to equal `value`
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            matcher: RequirementMatch::Equals(value.into()),
        }
    }
}

/// A job in a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job name, unique within the plan
    pub name: String,

    /// Job key, unique within the plan
    pub key: String,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Tasks run in order
    pub tasks: Vec<Task>,

    /// Tasks run after `tasks`, even when those fail
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub final_tasks: Vec<Task>,

    /// Agent capabilities required to run the job
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub requirements: Vec<Requirement>,

    /// Remove the working directory after the job finished
    #[serde(default)]
    pub clean_working_directory: bool,
}

impl Validate for Job {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        validate_name(&self.name)?;
        validate_key(&self.key)?;

        if self.tasks.is_empty() {
            return Err(ValidationError::EmptyJob {
                job: self.name.clone(),
            });
        }

        Ok(())
    }
}

impl Job {
    /// Creates a new job without tasks
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            description: None,
            tasks: Vec::new(),
            final_tasks: Vec::new(),
            requirements: Vec::new(),
            clean_working_directory: false,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends tasks
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    /// Appends final tasks
    pub fn with_final_tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.final_tasks.extend(tasks);
        self
    }

    /// Adds a requirement
    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Sets whether the working directory is removed after the build
    pub fn with_clean_working_directory(mut self, clean: bool) -> Self {
        self.clean_working_directory = clean;
        self
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job({}/{}): {} tasks", self.key, self.name, self.tasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job::new("Unit 7.2 locked", "UT072").with_tasks([Task::checkout()])
    }

    #[test]
    fn test_job_creation() {
        let job = job()
            .with_description("Run unit tests")
            .with_requirement(Requirement::exists("system.hasDocker"))
            .with_final_tasks([Task::junit(vec!["var/tests/*.xml".to_string()])]);

        assert_eq!(job.tasks.len(), 1);
        assert_eq!(job.final_tasks.len(), 1);
        assert_eq!(job.requirements[0].matcher, RequirementMatch::Exists);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_job_validation_without_tasks() {
        let job = Job::new("Empty", "EMPTY");
        assert!(matches!(job.validate(), Err(ValidationError::EmptyJob { .. })));
    }

    #[test]
    fn test_job_validation_invalid_key() {
        let mut job = job();
        job.key = "ut-72".to_string();
        assert!(matches!(job.validate(), Err(ValidationError::InvalidKey { .. })));
    }

    #[test]
    fn test_requirement_equals() {
        let req = Requirement::equals("system.phpVersion", "7.2");
        assert_eq!(req.matcher, RequirementMatch::Equals("7.2".to_string()));
    }

    #[test]
    fn test_job_display() {
        assert_eq!(job().to_string(), "Job(UT072/Unit 7.2 locked): 1 tasks");
    }
}
