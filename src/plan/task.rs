//! Task types for jobs
//!
//! A task is one atomic unit of work inside a job. Jobs run their tasks in
//! order, then their final tasks regardless of the outcome.

#![allow(clippy::must_use_candidate, clippy::return_self_not_must_use)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of test report a [`Task::TestParser`] reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestParserKind {
    /// JUnit XML reports
    Junit,
}

/// Tasks available in jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Task {
    /// Checkout of the plan's default repository
    Checkout {
        /// Wipe the working directory before checking out
        force_clean: bool,
    },

    /// Inline shell script
    Script {
        /// Human readable description shown in the plan UI
        description: String,
        /// Script body
        body: String,
    },

    /// Test result parser
    #[serde(rename = "test-parser")]
    TestParser {
        /// Report format
        kind: TestParserKind,
        /// Glob patterns of the report files
        result_directories: Vec<String>,
    },
}

impl Task {
    /// Creates a checkout task of the default repository
    pub fn checkout() -> Self {
        Self::Checkout { force_clean: false }
    }

    /// Creates a script task
    pub fn script(description: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Script {
            description: description.into(),
            body: body.into(),
        }
    }

    /// Creates a JUnit test parser reading the given result patterns
    pub fn junit(result_directories: Vec<String>) -> Self {
        Self::TestParser {
            kind: TestParserKind::Junit,
            result_directories,
        }
    }

    /// Returns the description used when listing the task
    pub fn description(&self) -> &str {
        match self {
            Self::Checkout { .. } => "Checkout Default Repository",
            Self::Script { description, .. } => description,
            Self::TestParser { .. } => "Parse test results",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkout { .. } => write!(f, "checkout"),
            Self::Script { description, .. } => write!(f, "script({description})"),
            Self::TestParser { result_directories, .. } => {
                write!(f, "junit({})", result_directories.join(", "))
            }
        }
    }
}
