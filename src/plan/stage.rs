//! Stage types for plan definition
//!
//! Stages run one after the other; the jobs of a stage run in parallel.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use super::Validate;
use super::errors::ValidationError;
use super::job::Job;
use super::types::validate_name;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stage in a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// Stage name
    pub name: String,

    /// Stage only runs when started by hand
    #[serde(default)]
    pub manual: bool,

    /// Stage runs even when a previous stage failed
    #[serde(default, rename = "final")]
    pub final_stage: bool,

    /// Jobs in this stage
    pub jobs: Vec<Job>,
}

impl Validate for Stage {
    type Error = ValidationError;

    fn validate(&self) -> Result<(), Self::Error> {
        validate_name(&self.name)?;

        if self.jobs.is_empty() {
            return Err(ValidationError::EmptyStage {
                stage: self.name.clone(),
            });
        }

        for job in &self.jobs {
            job.validate()?;
        }

        Ok(())
    }
}

impl Stage {
    /// Creates a new stage
    pub fn new(name: impl Into<String>, jobs: Vec<Job>) -> Self {
        Self {
            name: name.into(),
            manual: false,
            final_stage: false,
            jobs,
        }
    }

    /// Marks the stage as manual
    pub fn with_manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    /// Marks the stage as final
    pub fn with_final(mut self, final_stage: bool) -> Self {
        self.final_stage = final_stage;
        self
    }

    /// Returns number of jobs
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage({}): {} jobs", self.name, self.jobs.len())
    }
}
