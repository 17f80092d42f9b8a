//! YAML plan backend
//!
//! Translates plans and plan permissions to version 2 YAML plan documents,
//! the format the plan server imports.

use crate::plan::{
    BranchCreation, Job, NotificationEvent, Permission, Plan, PlanError, PlanPermissions,
    PluginConfiguration, RequirementMatch, Stage, Task, TestParserKind, Trigger,
};
use serde_yaml::{Mapping, Number, Value};

/// Version of the YAML plan format emitted
pub const FORMAT_VERSION: u64 = 2;

/// Backend for generating YAML plan documents
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlBackend;

impl YamlBackend {
    /// Creates a new YAML backend
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Translates a plan to its YAML document
    #[allow(clippy::missing_errors_doc)]
    pub fn translate(&self, plan: &Plan) -> Result<String, PlanError> {
        let mut doc = Mapping::new();
        doc.insert("version".into(), number(FORMAT_VERSION));

        let mut header = Mapping::new();
        header.insert("project-key".into(), plan.project.key.as_str().into());
        header.insert("key".into(), plan.key.as_str().into());
        header.insert("name".into(), plan.name.as_str().into());
        if let Some(description) = &plan.description {
            header.insert("description".into(), description.as_str().into());
        }
        doc.insert("plan".into(), Value::Mapping(header));

        doc.insert(
            "stages".into(),
            Value::Sequence(plan.stages.iter().map(translate_stage).collect()),
        );

        // Job definitions are top level keys named after the job
        for stage in &plan.stages {
            for job in &stage.jobs {
                doc.insert(job.name.as_str().into(), translate_job(job));
            }
        }

        if !plan.linked_repositories.is_empty() {
            doc.insert("repositories".into(), strings(&plan.linked_repositories));
        }

        if !plan.triggers.is_empty() {
            doc.insert(
                "triggers".into(),
                Value::Sequence(plan.triggers.iter().map(translate_trigger).collect()),
            );
        }

        if !plan.variables.is_empty() {
            let variables: Mapping = plan
                .variables
                .iter()
                .map(|v| (v.name.as_str().into(), v.value.as_str().into()))
                .collect();
            doc.insert("variables".into(), Value::Mapping(variables));
        }

        doc.insert("branches".into(), translate_branches(plan));

        if !plan.notifications.is_empty() {
            let notifications = plan
                .notifications
                .iter()
                .map(|notification| {
                    let recipients = notification
                        .recipients
                        .iter()
                        .map(|r| {
                            let mut custom = Mapping::new();
                            custom.insert("plugin-key".into(), r.plugin.as_str().into());
                            custom.insert("recipient".into(), r.recipient.as_str().into());
                            single("custom", Value::Mapping(custom))
                        })
                        .collect();

                    let mut entry = Mapping::new();
                    entry.insert(
                        "events".into(),
                        Value::Sequence(vec![event_name(notification.event).into()]),
                    );
                    entry.insert("recipients".into(), Value::Sequence(recipients));
                    Value::Mapping(entry)
                })
                .collect();
            doc.insert("notifications".into(), Value::Sequence(notifications));
        }

        if let Some(other) = translate_plugins(&plan.plugins) {
            doc.insert("other".into(), other);
        }

        let yaml = serde_yaml::to_string(&Value::Mapping(doc))?;
        tracing::debug!(plan = %plan.identifier(), bytes = yaml.len(), "rendered plan");
        Ok(yaml)
    }

    /// Translates plan permissions to their YAML document
    #[allow(clippy::missing_errors_doc)]
    pub fn translate_permissions(&self, permissions: &PlanPermissions) -> Result<String, PlanError> {
        let mut doc = Mapping::new();
        doc.insert("version".into(), number(FORMAT_VERSION));
        doc.insert(
            "plan".into(),
            single("key", permissions.plan_identifier().into()),
        );

        let mut grants = Vec::new();
        for grant in &permissions.groups {
            let mut entry = Mapping::new();
            entry.insert("groups".into(), Value::Sequence(vec![grant.group.as_str().into()]));
            entry.insert("permissions".into(), permission_names(&grant.permissions));
            grants.push(Value::Mapping(entry));
        }
        if !permissions.logged_in.is_empty() {
            let mut entry = Mapping::new();
            entry.insert("roles".into(), Value::Sequence(vec!["logged-in".into()]));
            entry.insert("permissions".into(), permission_names(&permissions.logged_in));
            grants.push(Value::Mapping(entry));
        }
        if permissions.anonymous_view {
            let mut entry = Mapping::new();
            entry.insert("roles".into(), Value::Sequence(vec!["anonymous".into()]));
            entry.insert("permissions".into(), permission_names(&[Permission::View]));
            grants.push(Value::Mapping(entry));
        }
        doc.insert("plan-permissions".into(), Value::Sequence(grants));

        Ok(serde_yaml::to_string(&Value::Mapping(doc))?)
    }
}

fn number(value: u64) -> Value {
    Value::Number(Number::from(value))
}

fn strings(values: &[String]) -> Value {
    Value::Sequence(values.iter().map(|v| v.as_str().into()).collect())
}

/// Mapping with a single entry
fn single(key: &str, value: Value) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(key.into(), value);
    Value::Mapping(mapping)
}

fn translate_stage(stage: &Stage) -> Value {
    let mut body = Mapping::new();
    body.insert("manual".into(), stage.manual.into());
    body.insert("final".into(), stage.final_stage.into());
    body.insert(
        "jobs".into(),
        Value::Sequence(stage.jobs.iter().map(|j| j.name.as_str().into()).collect()),
    );
    single(&stage.name, Value::Mapping(body))
}

fn translate_job(job: &Job) -> Value {
    let mut body = Mapping::new();
    body.insert("key".into(), job.key.as_str().into());
    if let Some(description) = &job.description {
        body.insert("description".into(), description.as_str().into());
    }
    body.insert(
        "tasks".into(),
        Value::Sequence(job.tasks.iter().map(translate_task).collect()),
    );
    if !job.final_tasks.is_empty() {
        body.insert(
            "final-tasks".into(),
            Value::Sequence(job.final_tasks.iter().map(translate_task).collect()),
        );
    }
    if !job.requirements.is_empty() {
        let requirements = job
            .requirements
            .iter()
            .map(|req| match &req.matcher {
                RequirementMatch::Exists => req.key.as_str().into(),
                RequirementMatch::Equals(value) => single(&req.key, value.as_str().into()),
            })
            .collect();
        body.insert("requirements".into(), Value::Sequence(requirements));
    }
    body.insert(
        "other".into(),
        single("clean-working-dir", job.clean_working_directory.into()),
    );
    Value::Mapping(body)
}

fn translate_task(task: &Task) -> Value {
    match task {
        Task::Checkout { force_clean } => {
            single("checkout", single("force-clean-build", (*force_clean).into()))
        }
        Task::Script { description, body } => {
            let mut script = Mapping::new();
            script.insert("interpreter".into(), "SHELL".into());
            script.insert(
                "scripts".into(),
                Value::Sequence(vec![body.as_str().into()]),
            );
            script.insert("description".into(), description.as_str().into());
            single("script", Value::Mapping(script))
        }
        Task::TestParser {
            kind,
            result_directories,
        } => {
            let mut parser = Mapping::new();
            parser.insert(
                "type".into(),
                match kind {
                    TestParserKind::Junit => "junit",
                }
                .into(),
            );
            parser.insert("test-results".into(), strings(result_directories));
            single("test-parser", Value::Mapping(parser))
        }
    }
}

fn translate_trigger(trigger: &Trigger) -> Value {
    match trigger {
        Trigger::Scheduled {
            name,
            description,
            cron,
        } => {
            let mut body = Mapping::new();
            body.insert("expression".into(), cron.as_str().into());
            body.insert("name".into(), name.as_str().into());
            if let Some(description) = description {
                body.insert("description".into(), description.as_str().into());
            }
            single("cron", Value::Mapping(body))
        }
    }
}

fn translate_branches(plan: &Plan) -> Value {
    let management = &plan.branch_management;
    let mut body = Mapping::new();
    body.insert(
        "create".into(),
        match management.create {
            BranchCreation::Manually => "manually",
            BranchCreation::ForNewBranch => "for-new-branch",
        }
        .into(),
    );
    let delete = match management.delete {
        Some(cleanup) => {
            let mut rules = Mapping::new();
            rules.insert(
                "after-deleted-days".into(),
                number(cleanup.after_deleted_days.into()),
            );
            rules.insert(
                "after-inactive-days".into(),
                number(cleanup.after_inactive_days.into()),
            );
            Value::Mapping(rules)
        }
        None => "never".into(),
    };
    body.insert("delete".into(), delete);
    body.insert(
        "notification".into(),
        if management.notify_committers {
            "notify-committers"
        } else {
            "inherit"
        }
        .into(),
    );
    Value::Mapping(body)
}

fn translate_plugins(plugins: &PluginConfiguration) -> Option<Value> {
    let mut other = Mapping::new();
    if let Some(expiry) = plugins.build_expiry {
        let mut body = Mapping::new();
        body.insert("duration".into(), format!("{} days", expiry.duration_days).into());
        body.insert(
            "maximum-builds-to-keep".into(),
            number(expiry.builds_to_keep.into()),
        );
        body.insert("expire-artifacts".into(), expiry.expire_artifacts.into());
        body.insert("expire-logs".into(), expiry.expire_logs.into());
        other.insert("build-expiry".into(), Value::Mapping(body));
    }
    if let Some(builds) = plugins.concurrent_builds {
        other.insert("concurrent-build-plugin".into(), number(builds.into()));
    }
    (!other.is_empty()).then_some(Value::Mapping(other))
}

fn event_name(event: NotificationEvent) -> &'static str {
    match event {
        NotificationEvent::PlanCompleted => "plan-completed",
        NotificationEvent::PlanFailed => "plan-failed",
    }
}

fn permission_name(permission: Permission) -> &'static str {
    match permission {
        Permission::View => "view",
        Permission::Edit => "edit",
        Permission::Build => "build",
        Permission::Clone => "clone",
        Permission::Admin => "admin",
    }
}

fn permission_names(permissions: &[Permission]) -> Value {
    Value::Sequence(
        permissions
            .iter()
            .map(|p| permission_name(*p).into())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nightly::NightlyPlan;
    use crate::plan::{Job, Project, Requirement, Stage, Variable};

    fn small_plan() -> Plan {
        Plan::builder(Project::new("TYPO3 Core", "CORE"), "Small", "SMALL")
            .stage(Stage::new(
                "Build",
                vec![
                    Job::new("Lint", "LINT")
                        .with_tasks([Task::checkout(), Task::script("lint", "make lint")])
                        .with_requirement(Requirement::equals("system.phpVersion", "7.2")),
                ],
            ))
            .variable(Variable::new("patchset", ""))
            .build_unchecked()
    }

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_plan_header() {
        let yaml = YamlBackend::new().translate(&small_plan()).unwrap();
        let doc = parse(&yaml);

        assert_eq!(doc["version"], number(2));
        assert_eq!(doc["plan"]["project-key"], Value::from("CORE"));
        assert_eq!(doc["plan"]["key"], Value::from("SMALL"));
        assert!(doc["plan"].get("description").is_none());
    }

    #[test]
    fn test_stage_lists_job_names() {
        let doc = parse(&YamlBackend::new().translate(&small_plan()).unwrap());

        let stage = &doc["stages"][0]["Build"];
        assert_eq!(stage["manual"], Value::from(false));
        assert_eq!(stage["jobs"][0], Value::from("Lint"));
    }

    #[test]
    fn test_job_definition() {
        let doc = parse(&YamlBackend::new().translate(&small_plan()).unwrap());

        let job = &doc["Lint"];
        assert_eq!(job["key"], Value::from("LINT"));
        assert_eq!(job["tasks"][0]["checkout"]["force-clean-build"], Value::from(false));
        assert_eq!(job["tasks"][1]["script"]["scripts"][0], Value::from("make lint"));
        assert_eq!(job["requirements"][0]["system.phpVersion"], Value::from("7.2"));
        assert!(job.get("final-tasks").is_none());
    }

    #[test]
    fn test_every_job_is_a_top_level_entry() {
        let plan = NightlyPlan::new().create_plan().unwrap();
        let doc = parse(&YamlBackend::new().translate(&plan).unwrap());

        let Value::Mapping(entries) = &doc else {
            panic!("plan document is not a mapping");
        };
        let sections = entries
            .keys()
            .filter_map(Value::as_str)
            .filter(|key| crate::plan::RESERVED_JOB_NAMES.contains(key))
            .count();
        assert_eq!(entries.len(), sections + plan.job_count());
        assert_eq!(doc["version"], number(2));
    }

    #[test]
    fn test_variables_and_branches() {
        let doc = parse(&YamlBackend::new().translate(&small_plan()).unwrap());

        assert_eq!(doc["variables"]["patchset"], Value::from(""));
        assert_eq!(doc["branches"]["create"], Value::from("manually"));
        assert_eq!(doc["branches"]["delete"], Value::from("never"));
        assert!(doc.get("notifications").is_none());
        assert!(doc.get("other").is_none());
    }

    #[test]
    fn test_nightly_plan_document() {
        let plan = NightlyPlan::new().create_plan().unwrap();
        let yaml = YamlBackend::new().translate(&plan).unwrap();
        let doc = parse(&yaml);

        assert_eq!(doc["plan"]["name"], Value::from("Core master nightly"));
        assert_eq!(doc["stages"].as_sequence().map(Vec::len), Some(15));
        assert!(doc["stages"][2].get("Jobs 1 - 50").is_some());
        assert_eq!(doc["triggers"][0]["cron"]["expression"], Value::from("0 0 3 ? * *"));
        assert_eq!(doc["repositories"][0], Value::from("github TYPO3 TYPO3.CMS"));
        assert_eq!(doc["branches"]["notification"], Value::from("notify-committers"));
        assert_eq!(doc["branches"]["delete"]["after-deleted-days"], number(7));
        assert_eq!(doc["notifications"][0]["events"][0], Value::from("plan-completed"));
        assert_eq!(
            doc["notifications"][0]["recipients"][0]["custom"]["recipient"],
            Value::from("https://intercept.typo3.com/bamboo")
        );
        assert_eq!(doc["other"]["build-expiry"]["duration"], Value::from("30 days"));
        assert_eq!(doc["Unit PHP72 composer locked"]["key"], Value::from("UT072"));
        assert_eq!(
            doc["Unit PHP72 composer locked"]["final-tasks"][0]["test-parser"]["type"],
            Value::from("junit")
        );
    }

    #[test]
    fn test_permissions_document() {
        let permissions = NightlyPlan::new().default_permissions();
        let doc = parse(&YamlBackend::new().translate_permissions(&permissions).unwrap());

        assert_eq!(doc["plan"]["key"], Value::from("CORE-GTN"));
        let grants = doc["plan-permissions"].as_sequence().unwrap();
        assert_eq!(grants.len(), 3);
        assert_eq!(grants[0]["groups"][0], Value::from("TYPO3 GmbH"));
        assert_eq!(grants[0]["permissions"].as_sequence().map(Vec::len), Some(5));
        assert_eq!(grants[1]["roles"][0], Value::from("logged-in"));
        assert_eq!(grants[2]["roles"][0], Value::from("anonymous"));
    }
}
