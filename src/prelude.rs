//! Prelude module for common imports

// Plan model
pub use crate::plan::chunk::{Partition, chunk_jobs, partition};
pub use crate::plan::errors::{PlanError, ValidationError};
pub use crate::plan::job::{Job, Requirement};
pub use crate::plan::options::{
    BuildExpiry, Notification, NotificationEvent, PlanBranchManagement, PluginConfiguration,
    Trigger, Variable,
};
pub use crate::plan::permissions::{Permission, PlanPermissions};
pub use crate::plan::plan_def::{Plan, PlanBuilder, Project};
pub use crate::plan::stage::Stage;
pub use crate::plan::task::Task;
pub use crate::plan::types::Validate;

// Nightly plan
pub use crate::nightly::{ComposerStage, Dbms, NightlyPlan, PhpVersion};

// Rendering and publishing
pub use crate::infrastructure::{
    BambooServer, Config, Credentials, DryRunPublisher, PlanPublisher, YamlBackend, publish,
};
