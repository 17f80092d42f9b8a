//! The nightly test plan
//!
//! Matrix values, job factories and the assembly of the final plan.

pub mod definition;
pub mod jobs;
pub mod matrix;

pub use definition::NightlyPlan;
pub use matrix::{ComposerStage, Dbms, Driver, JOB_LIST_SIZE, PHP_VERSIONS, PhpVersion};
