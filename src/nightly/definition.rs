//! The core nightly plan
//!
//! Expands the test matrix into the flat job list, splits it into stages of
//! at most [`JOB_LIST_SIZE`] jobs and assembles the plan behind the two fixed
//! stages "Preparation" and "Integrity".

#![allow(clippy::must_use_candidate)]

use super::jobs;
use super::matrix::{
    ACCEPTANCE_JOBS, ComposerStage, Dbms, Driver, FUNCTIONAL_MSSQL_JOBS, FUNCTIONAL_MYSQL_JOBS,
    FUNCTIONAL_PGSQL_JOBS, FUNCTIONAL_SQLITE_JOBS, JOB_LIST_SIZE, PHP_VERSIONS, PhpVersion,
    UNIT_RANDOM_ORDER_JOBS, matrix_points,
};
use crate::plan::{
    BranchCleanup, BuildExpiry, Job, Notification, NotificationEvent, Permission, Plan,
    PlanBranchManagement, PlanPermissions, PluginConfiguration, Project, Stage, Trigger,
    ValidationError, Variable, chunk_jobs,
};
use std::num::NonZeroUsize;

/// Project the plan lives in
pub const PROJECT_NAME: &str = "TYPO3 Core";
/// Key of [`PROJECT_NAME`]
pub const PROJECT_KEY: &str = "CORE";
/// Plan name
pub const PLAN_NAME: &str = "Core master nightly";
/// Plan key
pub const PLAN_KEY: &str = "GTN";
/// Plan description
pub const PLAN_DESCRIPTION: &str =
    "Execute TYPO3 core master nightly tests. Auto generated! See Build/bamboo of core git repository.";
/// Repository checked out by every job
pub const LINKED_REPOSITORY: &str = "github TYPO3 TYPO3.CMS";
/// Daily at 03:00, quartz syntax
pub const SCHEDULE: &str = "0 0 3 ? * *";
/// Plugin delivering build results to chat
pub const SLACK_RECIPIENT_PLUGIN: &str = "com.atlassian.bamboo.plugins.bamboo-slack:recipient.slack";
/// Endpoint receiving completed build notifications
pub const SLACK_RECIPIENT_URL: &str = "https://intercept.typo3.com/bamboo";
/// Group administering core plans
pub const ADMIN_GROUP: &str = "TYPO3 GmbH";

/// Generator of the nightly plan
#[derive(Debug, Clone)]
pub struct NightlyPlan {
    php_versions: Vec<PhpVersion>,
    job_list_size: NonZeroUsize,
}

impl Default for NightlyPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl NightlyPlan {
    /// Creates the generator with the compiled-in matrix
    pub fn new() -> Self {
        Self {
            php_versions: PHP_VERSIONS.to_vec(),
            job_list_size: JOB_LIST_SIZE,
        }
    }

    /// Overrides the maximum number of jobs per stage
    #[must_use]
    pub fn with_job_list_size(mut self, size: NonZeroUsize) -> Self {
        self.job_list_size = size;
        self
    }

    /// Project owning the plan
    pub fn project() -> Project {
        Project::new(PROJECT_NAME, PROJECT_KEY)
    }

    /// Builds and validates the full plan
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the generated plan is inconsistent,
    /// e.g. two jobs share a key.
    pub fn create_plan(&self) -> Result<Plan, ValidationError> {
        let job_stages = chunk_jobs(self.matrix_jobs(), self.job_list_size);

        let plan = Plan::builder(Self::project(), PLAN_NAME, PLAN_KEY)
            .description(PLAN_DESCRIPTION)
            .plugins(Self::plugin_configuration())
            .stage(self.preparation_stage())
            .stage(self.integrity_stage())
            .stages(job_stages)
            .linked_repository(LINKED_REPOSITORY)
            .trigger(Trigger::scheduled("Scheduled", SCHEDULE).with_description("once a day"))
            .variable(Variable::new("changeUrl", ""))
            .variable(Variable::new("patchset", ""))
            .branch_management(
                PlanBranchManagement::new()
                    .delete(BranchCleanup::default())
                    .notification_for_committers(),
            )
            .notification(
                Notification::new(NotificationEvent::PlanCompleted)
                    .recipient(SLACK_RECIPIENT_PLUGIN, SLACK_RECIPIENT_URL),
            )
            .build()?;

        tracing::info!(
            plan = %plan.identifier(),
            stages = plan.stage_count(),
            jobs = plan.job_count(),
            "created plan"
        );
        Ok(plan)
    }

    /// Permissions published alongside the plan
    pub fn default_permissions(&self) -> PlanPermissions {
        PlanPermissions::new(PROJECT_KEY, PLAN_KEY)
            .group(ADMIN_GROUP, &Permission::ALL)
            .logged_in(&[Permission::View])
            .anonymous_view()
    }

    fn plugin_configuration() -> PluginConfiguration {
        PluginConfiguration::new().with_build_expiry(BuildExpiry::new(30, 10))
    }

    /// Preparation stage: only defines labels used to report results
    pub fn preparation_stage(&self) -> Stage {
        Stage::new("Preparation", vec![jobs::build_labels()])
    }

    /// Integrity stage: code quality checks independent of the matrix
    pub fn integrity_stage(&self) -> Stage {
        // Any version works for the checks; linting below covers all of them.
        let php = self.php_versions[0];

        let mut stage_jobs = vec![
            jobs::integration_annotations(php),
            jobs::cgl_check_full_core(php),
            jobs::integration_doc_blocks(php),
            jobs::integration_various(php),
            jobs::lint_scss_ts(),
            jobs::unit_javascript(php),
            jobs::composer_validate(php),
        ];
        stage_jobs.extend(self.php_versions.iter().map(|&php| jobs::lint_php(php)));

        Stage::new("Integrity", stage_jobs)
    }

    /// The flat, ordered job list of all matrix suites
    pub fn matrix_jobs(&self) -> Vec<Job> {
        let suites: [fn(PhpVersion, ComposerStage) -> Vec<Job>; 10] = [
            unit_test_jobs,
            codeception_mysql_jobs,
            |php, stage| vec![jobs::acceptance_install(php, stage, Dbms::Sqlite)],
            |php, stage| vec![jobs::acceptance_install(php, stage, Dbms::Postgres)],
            |php, stage| {
                jobs::functional(php, stage, Dbms::Mysql, Some(Driver::Mysqli), FUNCTIONAL_MYSQL_JOBS)
            },
            |php, stage| {
                jobs::functional(php, stage, Dbms::Mysql, Some(Driver::PdoMysql), FUNCTIONAL_MYSQL_JOBS)
            },
            |php, stage| {
                jobs::functional(php, stage, Dbms::Mssql, Some(Driver::Sqlsrv), FUNCTIONAL_MSSQL_JOBS)
            },
            |php, stage| {
                jobs::functional(php, stage, Dbms::Mssql, Some(Driver::PdoSqlsrv), FUNCTIONAL_MSSQL_JOBS)
            },
            |php, stage| jobs::functional(php, stage, Dbms::Postgres, None, FUNCTIONAL_PGSQL_JOBS),
            |php, stage| jobs::functional(php, stage, Dbms::Sqlite, None, FUNCTIONAL_SQLITE_JOBS),
        ];

        let points: Vec<(PhpVersion, ComposerStage)> = matrix_points()
            .filter(|(php, _)| self.php_versions.contains(php))
            .collect();

        let job_list: Vec<Job> = suites
            .iter()
            .flat_map(|suite| points.iter().flat_map(move |&(php, stage)| suite(php, stage)))
            .collect();

        tracing::debug!(jobs = job_list.len(), "expanded test matrix");
        job_list
    }
}

/// Random order, deprecated and regular unit tests
fn unit_test_jobs(php: PhpVersion, stage: ComposerStage) -> Vec<Job> {
    let mut suite = jobs::unit_random(php, stage, UNIT_RANDOM_ORDER_JOBS);
    suite.push(jobs::unit_deprecated(php, stage));
    suite.push(jobs::unit(php, stage));
    suite
}

/// Installer acceptance test followed by the backend acceptance chunks
fn codeception_mysql_jobs(php: PhpVersion, stage: ComposerStage) -> Vec<Job> {
    let mut suite = vec![jobs::acceptance_install(php, stage, Dbms::Mysql)];
    suite.extend(jobs::acceptance_backend_mysql(php, stage, ACCEPTANCE_JOBS));
    suite
}
