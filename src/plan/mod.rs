//! Plan domain types and logic

pub mod chunk;
pub mod errors;
pub mod job;
pub mod options;
pub mod permissions;
pub mod plan_def;
pub mod stage;
pub mod task;
pub mod types;


pub use chunk::{Partition, chunk_jobs, partition, partition_label};
pub use errors::{PlanError, ValidationError};
pub use job::{Job, Requirement, RequirementMatch};
pub use options::{
    BranchCleanup, BranchCreation, BuildExpiry, Notification, NotificationEvent,
    NotificationRecipient, PlanBranchManagement, PluginConfiguration, Trigger, Variable,
};
pub use permissions::{GroupPermission, Permission, PlanPermissions};
pub use plan_def::{Plan, PlanBuilder, Project, RESERVED_JOB_NAMES};
pub use stage::Stage;
pub use task::{Task, TestParserKind};
pub use types::Validate;
