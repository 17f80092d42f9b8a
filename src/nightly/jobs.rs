//! Job factories
//!
//! One function per kind of job in the nightly plan. Test jobs share a
//! layout: checkout, composer install for their stage, one test runner
//! invocation, then JUnit parsing and container cleanup as final tasks.

use super::matrix::{ComposerStage, Dbms, Driver, PhpVersion};
use crate::plan::{Job, Requirement, Task};

/// Test runner script, relative to the repository root
pub const TEST_RUNNER: &str = "Build/Scripts/runTests.sh";

/// Report files collected by the JUnit parser
pub const TEST_RESULTS: &str = "var/tests/*.xml";

/// Agent capability every job requires
pub const DOCKER_CAPABILITY: &str = "system.hasDocker";

/// Builds a test runner command line, quoting arguments where needed.
pub fn runner_command(args: &[&str]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(TEST_RUNNER);
    words.extend_from_slice(args);
    shell_words::join(words)
}

/// Script task running the test runner with `args`
fn runner_task(description: impl Into<String>, args: &[&str]) -> Task {
    Task::script(description, runner_command(args))
}

/// Composer install task for `stage`
pub fn composer_task(php: PhpVersion, stage: ComposerStage) -> Task {
    let runner_php = php.runner();
    runner_task(stage.label(), &["-s", stage.runner_suite(), "-p", &runner_php])
}

/// Composer install with the locked versions
pub fn composer_install_task(php: PhpVersion) -> Task {
    composer_task(php, ComposerStage::Locked)
}

fn cleanup_task() -> Task {
    Task::script(
        "Stop containers",
        "docker compose -p \"${bamboo.buildResultKey}\" down -v --remove-orphans || true",
    )
}

/// Job skeleton shared by all jobs: docker requirement and a clean workspace
fn base_job(name: String, key: String) -> Job {
    Job::new(name, key)
        .with_requirement(Requirement::exists(DOCKER_CAPABILITY))
        .with_clean_working_directory(true)
}

/// Test job: checkout, `setup`, the runner invocation, then result parsing
fn test_job(name: String, key: String, setup: Option<Task>, args: &[&str]) -> Job {
    let description = name.clone();
    base_job(name, key)
        .with_tasks(std::iter::once(Task::checkout()).chain(setup))
        .with_tasks([runner_task(description, args)])
        .with_final_tasks([Task::junit(vec![TEST_RESULTS.to_string()]), cleanup_task()])
}

fn point_key(prefix: &str, php: PhpVersion, stage: ComposerStage) -> String {
    format!("{prefix}{}{}", stage.number(), php.digits())
}

fn chunk_key(prefix: &str, php: PhpVersion, stage: ComposerStage, chunk: usize) -> String {
    format!("{}{chunk:02}", point_key(prefix, php, stage))
}

/// Preparation job: sets the labels later used to report results
pub fn build_labels() -> Job {
    base_job("Create build labels".to_string(), "CLFB".to_string())
        .with_description("Label the build with the change under test")
        .with_tasks([Task::script(
            "Print labels",
            "echo \"change ${bamboo.changeUrl} patchset ${bamboo.patchset}\"",
        )])
}

/// Unit tests
pub fn unit(php: PhpVersion, stage: ComposerStage) -> Job {
    let runner_php = php.runner();
    test_job(
        format!("Unit {php} {stage}"),
        point_key("UT", php, stage),
        Some(composer_task(php, stage)),
        &["-s", "unit", "-p", &runner_php],
    )
}

/// Unit tests of deprecated code
pub fn unit_deprecated(php: PhpVersion, stage: ComposerStage) -> Job {
    let runner_php = php.runner();
    test_job(
        format!("Unit deprecated {php} {stage}"),
        point_key("UTD", php, stage),
        Some(composer_task(php, stage)),
        &["-s", "unitDeprecated", "-p", &runner_php],
    )
}

/// `count` unit jobs with random test order
pub fn unit_random(php: PhpVersion, stage: ComposerStage, count: usize) -> Vec<Job> {
    let runner_php = php.runner();
    (1..=count)
        .map(|n| {
            test_job(
                format!("Unit random {n} {php} {stage}"),
                chunk_key("UTR", php, stage, n),
                Some(composer_task(php, stage)),
                &["-s", "unitRandom", "-p", &runner_php],
            )
        })
        .collect()
}

/// Acceptance test of the installer on `dbms`
pub fn acceptance_install(php: PhpVersion, stage: ComposerStage, dbms: Dbms) -> Job {
    let runner_php = php.runner();
    test_job(
        format!("Accept install {dbms} {php} {stage}"),
        point_key(&format!("AI{}", dbms.key_code()), php, stage),
        Some(composer_task(php, stage)),
        &[
            "-s",
            "acceptanceInstall",
            "-d",
            dbms.runner(),
            "-i",
            dbms.default_version(),
            "-p",
            &runner_php,
        ],
    )
}

/// `count` acceptance backend jobs on MySQL, each running one chunk
pub fn acceptance_backend_mysql(php: PhpVersion, stage: ComposerStage, count: usize) -> Vec<Job> {
    let runner_php = php.runner();
    let dbms = Dbms::Mysql;
    (1..=count)
        .map(|n| {
            let chunk = format!("{n}/{count}");
            test_job(
                format!("Accept backend {dbms} {n} {php} {stage}"),
                chunk_key("ABMY", php, stage, n),
                Some(composer_task(php, stage)),
                &[
                    "-s",
                    "acceptance",
                    "-d",
                    dbms.runner(),
                    "-i",
                    dbms.default_version(),
                    "-p",
                    &runner_php,
                    "-c",
                    &chunk,
                ],
            )
        })
        .collect()
}

/// `count` functional jobs on `dbms`, each running one chunk
///
/// `driver` is `None` for engines with a single PHP driver.
pub fn functional(
    php: PhpVersion,
    stage: ComposerStage,
    dbms: Dbms,
    driver: Option<Driver>,
    count: usize,
) -> Vec<Job> {
    let runner_php = php.runner();
    let prefix = format!(
        "F{}{}",
        dbms.key_code(),
        if driver.is_some_and(Driver::is_pdo) { "P" } else { "" }
    );
    let engine = match driver {
        Some(driver) => format!("{dbms} {driver}"),
        None => dbms.to_string(),
    };

    (1..=count)
        .map(|n| {
            let chunk = format!("{n}/{count}");
            let mut args = vec!["-s", "functional", "-d", dbms.runner()];
            if let Some(driver) = driver {
                args.extend(["-a", driver.runner()]);
            }
            args.extend([
                "-i",
                dbms.default_version(),
                "-p",
                runner_php.as_str(),
                "-c",
                chunk.as_str(),
            ]);
            test_job(
                format!("Func {engine} {n} {php} {stage}"),
                chunk_key(&prefix, php, stage, n),
                Some(composer_task(php, stage)),
                &args,
            )
        })
        .collect()
}

/// Annotation check
pub fn integration_annotations(php: PhpVersion) -> Job {
    let runner_php = php.runner();
    test_job(
        "Integration annotations".to_string(),
        "IANNO".to_string(),
        Some(composer_install_task(php)),
        &["-s", "checkAnnotations", "-p", &runner_php],
    )
}

/// Coding guideline check of the full core
pub fn cgl_check_full_core(php: PhpVersion) -> Job {
    let runner_php = php.runner();
    test_job(
        "Integration CGL".to_string(),
        "CGLCHECK".to_string(),
        Some(composer_install_task(php)),
        &["-s", "cglAll", "-n", "-p", &runner_php],
    )
}

/// Doc block check
pub fn integration_doc_blocks(php: PhpVersion) -> Job {
    let runner_php = php.runner();
    test_job(
        "Integration doc blocks".to_string(),
        "IDB".to_string(),
        Some(composer_install_task(php)),
        &["-s", "checkDocBlocks", "-p", &runner_php],
    )
}

/// Assorted repository integrity checks, one script line each
pub fn integration_various(php: PhpVersion) -> Job {
    const CHECKS: [&str; 8] = [
        "checkBom",
        "checkComposer",
        "checkExceptionCodes",
        "checkExtensionScannerRst",
        "checkFilePathLength",
        "checkGitSubmodule",
        "checkPermissions",
        "checkXlf",
    ];

    let runner_php = php.runner();
    let body = CHECKS
        .into_iter()
        .map(|check| runner_command(&["-s", check, "-p", runner_php.as_str()]))
        .collect::<Vec<_>>()
        .join("\n");

    base_job("Integration various".to_string(), "CDECC".to_string())
        .with_tasks([
            Task::checkout(),
            composer_install_task(php),
            Task::script("Integration various", body),
        ])
        .with_final_tasks([cleanup_task()])
}

/// SCSS and TypeScript lint
pub fn lint_scss_ts() -> Job {
    base_job("Lint scss ts".to_string(), "LSTS".to_string())
        .with_tasks([
            Task::checkout(),
            runner_task("Lint scss", &["-s", "lintScss"]),
            runner_task("Lint typescript", &["-s", "lintTypescript"]),
        ])
        .with_final_tasks([cleanup_task()])
}

/// JavaScript unit tests
pub fn unit_javascript(php: PhpVersion) -> Job {
    test_job(
        "Unit JavaScript".to_string(),
        "JSUT".to_string(),
        Some(composer_install_task(php)),
        &["-s", "unitJavascript"],
    )
}

/// `composer validate` of the root and all extension manifests
pub fn composer_validate(php: PhpVersion) -> Job {
    let runner_php = php.runner();
    base_job("Validate composer.json".to_string(), "VC".to_string())
        .with_tasks([
            Task::checkout(),
            runner_task("composer validate", &["-s", "composerValidate", "-p", &runner_php]),
        ])
        .with_final_tasks([cleanup_task()])
}

/// PHP syntax lint
pub fn lint_php(php: PhpVersion) -> Job {
    let runner_php = php.runner();
    base_job(format!("Lint {php}"), format!("L{}", php.digits()))
        .with_tasks([
            Task::checkout(),
            runner_task(format!("Lint {php}"), &["-s", "lint", "-p", &runner_php]),
        ])
        .with_final_tasks([cleanup_task()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nightly::matrix::PHP_VERSIONS;
    use crate::plan::Validate;
    use pretty_assertions::assert_eq;

    fn script_bodies(job: &Job) -> Vec<&str> {
        job.tasks
            .iter()
            .filter_map(|task| match task {
                Task::Script { body, .. } => Some(body.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_runner_command_quotes() {
        assert_eq!(
            runner_command(&["-s", "unit", "-p", "7.2"]),
            "Build/Scripts/runTests.sh -s unit -p 7.2"
        );
        assert_eq!(
            runner_command(&["-e", "--filter Foo"]),
            "Build/Scripts/runTests.sh -e '--filter Foo'"
        );
    }

    #[test]
    fn test_unit_job_layout() {
        let job = unit(PHP_VERSIONS[0], ComposerStage::Max);

        assert_eq!(job.name, "Unit PHP72 composer max");
        assert_eq!(job.key, "UT172");
        assert_eq!(
            script_bodies(&job),
            vec![
                "Build/Scripts/runTests.sh -s composerInstallMax -p 7.2",
                "Build/Scripts/runTests.sh -s unit -p 7.2",
            ]
        );
        assert!(matches!(job.tasks[0], Task::Checkout { .. }));
        assert!(matches!(job.final_tasks[0], Task::TestParser { .. }));
        assert_eq!(job.requirements, vec![Requirement::exists(DOCKER_CAPABILITY)]);
        assert!(job.validate().is_ok());
    }

    #[test]
    fn test_functional_jobs_with_driver() {
        let jobs = functional(
            PHP_VERSIONS[1],
            ComposerStage::Min,
            Dbms::Mssql,
            Some(Driver::PdoSqlsrv),
            16,
        );

        assert_eq!(jobs.len(), 16);
        assert_eq!(jobs[0].key, "FMSP27301");
        assert_eq!(jobs[15].key, "FMSP27316");
        assert_eq!(jobs[2].name, "Func MSSQL pdo_sqlsrv 3 PHP73 composer min");
        assert_eq!(
            script_bodies(&jobs[2])[1],
            "Build/Scripts/runTests.sh -s functional -d mssql -a pdo_sqlsrv -i 2012 -p 7.3 -c 3/16"
        );
    }

    #[test]
    fn test_functional_jobs_without_driver() {
        let jobs = functional(PHP_VERSIONS[2], ComposerStage::Locked, Dbms::Sqlite, None, 6);

        assert_eq!(jobs[5].key, "FSL07406");
        assert_eq!(
            script_bodies(&jobs[5])[1],
            "Build/Scripts/runTests.sh -s functional -d sqlite -i 3.15 -p 7.4 -c 6/6"
        );
    }

    #[test]
    fn test_driver_keys_are_distinct() {
        let native = functional(PHP_VERSIONS[0], ComposerStage::Locked, Dbms::Mysql, Some(Driver::Mysqli), 1);
        let pdo = functional(PHP_VERSIONS[0], ComposerStage::Locked, Dbms::Mysql, Some(Driver::PdoMysql), 1);
        assert_eq!(native[0].key, "FMY07201");
        assert_eq!(pdo[0].key, "FMYP07201");
    }

    #[test]
    fn test_acceptance_jobs() {
        let install = acceptance_install(PHP_VERSIONS[0], ComposerStage::Locked, Dbms::Postgres);
        assert_eq!(install.key, "AIPG072");
        assert!(script_bodies(&install)[1].contains("-d postgres -i 9.3"));

        let backend = acceptance_backend_mysql(PHP_VERSIONS[0], ComposerStage::Locked, 8);
        assert_eq!(backend.len(), 8);
        assert!(script_bodies(&backend[7])[1].ends_with("-c 8/8"));
    }

    #[test]
    fn test_unit_random_jobs() {
        let jobs = unit_random(PHP_VERSIONS[0], ComposerStage::Locked, 2);
        let keys: Vec<&str> = jobs.iter().map(|j| j.key.as_str()).collect();
        assert_eq!(keys, vec!["UTR07201", "UTR07202"]);
    }

    #[test]
    fn test_integrity_jobs_validate() {
        let php = PHP_VERSIONS[0];
        let jobs = [
            integration_annotations(php),
            cgl_check_full_core(php),
            integration_doc_blocks(php),
            integration_various(php),
            lint_scss_ts(),
            unit_javascript(php),
            composer_validate(php),
            lint_php(php),
            build_labels(),
        ];
        for job in &jobs {
            assert!(job.validate().is_ok(), "{job} is invalid");
        }
        assert_eq!(lint_php(PHP_VERSIONS[2]).key, "L74");
        assert_eq!(script_bodies(&integration_various(php))[1].lines().count(), 8);
    }
}
