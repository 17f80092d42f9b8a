//! # nightly-plan - the core nightly CI plan as code
//!
//! Builds the "Core master nightly" plan of the TYPO3 core project: a
//! PHP x composer x database test matrix expanded into several hundred jobs,
//! split into stages of at most fifty jobs, rendered to the plan server's
//! YAML import format and published together with its permissions.
//!
//! ## Layout
//!
//! - [`plan`]: plan object model, validation and the job list chunker
//! - [`nightly`]: the test matrix, job factories and plan assembly
//! - [`infrastructure`]: YAML rendering, configuration, credentials,
//!   logging and the plan server client
//!
//! ## Example
//!
//! ```
//! use nightly_plan::prelude::*;
//!
//! let plan = NightlyPlan::new().create_plan().unwrap();
//! assert_eq!(plan.identifier(), "CORE-GTN");
//! assert_eq!(plan.stages[0].name, "Preparation");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod infrastructure;
pub mod nightly;
pub mod plan;

// Prelude module for common imports
pub mod prelude;

// Re-export commonly used types
pub use infrastructure::{BambooServer, Config, Credentials, PlanPublisher, YamlBackend};
pub use nightly::NightlyPlan;
pub use plan::{Job, Plan, PlanBuilder, PlanError, PlanPermissions, Stage, Task, Validate, ValidationError};

/// Version of the nightly-plan crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
