//! Error types for the plan domain

use thiserror::Error;

/// Errors that can occur while building, rendering or publishing a plan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// Validation failed with specified reason
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Rendering the plan document failed
    #[error("Render error: {0}")]
    Render(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(String),

    /// Credentials could not be read or are incomplete
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Transport level failure talking to the plan server
    #[error("HTTP error: {0}")]
    Http(String),

    /// The plan server rejected a document
    #[error("Publish rejected with status {status}: {body}")]
    Publish {
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body returned by the server.
        body: String,
    },
}

impl From<std::io::Error> for PlanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for PlanError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Render(err.to_string())
    }
}

impl From<reqwest::Error> for PlanError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Validation errors for plan components
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name cannot be empty
    #[error("Name cannot be empty")]
    EmptyName,

    /// Name too long
    #[error("Name too long: max {max} characters, got {len}")]
    NameTooLong {
        /// Maximum allowed length.
        max: usize,
        /// Actual length of the name.
        len: usize,
    },

    /// Key is not uppercase alphanumeric starting with a letter
    #[error("Invalid key: '{key}'")]
    InvalidKey {
        /// The invalid key.
        key: String,
    },

    /// Two jobs of one plan share a key
    #[error("Duplicate job key '{key}' in stage '{stage}'")]
    DuplicateJobKey {
        /// The duplicated key.
        key: String,
        /// Stage holding the second occurrence.
        stage: String,
    },

    /// Two jobs of one plan share a name
    #[error("Duplicate job name '{name}' in stage '{stage}'")]
    DuplicateJobName {
        /// The duplicated name.
        name: String,
        /// Stage holding the second occurrence.
        stage: String,
    },

    /// Job name collides with a top level section of the plan document
    #[error("Job name '{name}' is reserved")]
    ReservedJobName {
        /// The reserved name.
        name: String,
    },

    /// Stage must have at least one job
    #[error("Stage '{stage}' must have at least one job")]
    EmptyStage {
        /// Name of the empty stage.
        stage: String,
    },

    /// Plan must have at least one stage
    #[error("Plan must have at least one stage")]
    EmptyPlan,

    /// Job must have at least one task
    #[error("Job '{job}' must have at least one task")]
    EmptyJob {
        /// Name of the empty job.
        job: String,
    },

    /// Invalid cron expression
    #[error("Invalid cron expression: '{0}'")]
    InvalidCronExpression(String),

    /// Notification recipient is incomplete
    #[error("Invalid notification recipient: {0}")]
    InvalidRecipient(String),
}
