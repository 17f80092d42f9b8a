//! Test matrix of the nightly plan
//!
//! PHP versions, database engines with their drivers and versions, and
//! composer install stages. All values are fixed at compile time.

#![allow(clippy::must_use_candidate)]

use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;

/// A PHP interpreter version as known to the agents, e.g. `PHP72`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PhpVersion(&'static str);

impl PhpVersion {
    /// Label used in job names and agent capabilities, e.g. `PHP72`
    pub fn label(self) -> &'static str {
        self.0
    }

    /// Digits of the version, e.g. `72`
    pub fn digits(self) -> &'static str {
        self.0.trim_start_matches("PHP")
    }

    /// Version as passed to the test runner, e.g. `7.2`
    pub fn runner(self) -> String {
        let digits = self.digits();
        match digits.split_at_checked(1) {
            Some((major, minor)) if !minor.is_empty() => format!("{major}.{minor}"),
            _ => digits.to_string(),
        }
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// PHP versions every matrix suite runs against
pub const PHP_VERSIONS: [PhpVersion; 3] = [PhpVersion("PHP72"), PhpVersion("PHP73"), PhpVersion("PHP74")];

/// Dependency installation variant a job runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposerStage {
    /// Versions pinned by the lock file
    Locked = 0,
    /// Highest versions allowed by the constraints
    Max = 1,
    /// Lowest versions allowed by the constraints
    Min = 2,
}

impl ComposerStage {
    /// All stages in stage number order
    pub const ALL: [Self; 3] = [Self::Locked, Self::Max, Self::Min];

    /// Looks up a stage by its number
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.number() == number)
    }

    /// Stage number, used in job keys
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Suite of the test runner installing this variant
    pub fn runner_suite(self) -> &'static str {
        match self {
            Self::Locked => "composerInstall",
            Self::Max => "composerInstallMax",
            Self::Min => "composerInstallMin",
        }
    }

    /// Suffix used in job names
    pub fn label(self) -> &'static str {
        match self {
            Self::Locked => "composer locked",
            Self::Max => "composer max",
            Self::Min => "composer min",
        }
    }
}

impl fmt::Display for ComposerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Database engine a job runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dbms {
    /// MySQL
    Mysql,
    /// MariaDB
    Mariadb,
    /// Microsoft SQL Server
    Mssql,
    /// PostgreSQL
    Postgres,
    /// SQLite
    Sqlite,
}

impl Dbms {
    /// All engines
    pub const ALL: [Self; 5] = [Self::Mysql, Self::Mariadb, Self::Mssql, Self::Postgres, Self::Sqlite];

    /// Name passed to the test runner
    pub fn runner(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Mssql => "mssql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Display name
    pub fn label(self) -> &'static str {
        match self {
            Self::Mysql => "MySQL",
            Self::Mariadb => "MariaDB",
            Self::Mssql => "MSSQL",
            Self::Postgres => "PostgreSQL",
            Self::Sqlite => "SQLite",
        }
    }

    /// Supported server versions, oldest first
    pub fn versions(self) -> &'static [&'static str] {
        match self {
            Self::Mysql => &["5.5", "5.6", "5.7"],
            Self::Mariadb => &["5.5", "10.0", "10.1", "10.3"],
            Self::Mssql => &["2012", "2014", "2016", "2017", "2019"],
            Self::Postgres => &["9.3", "9.4", "9.5", "9.6", "10.11", "11.6", "12.1"],
            Self::Sqlite => &["3.15", "3.20", "3.25", "3.30"],
        }
    }

    /// Version nightly jobs run against: the oldest supported one
    pub fn default_version(self) -> &'static str {
        self.versions()[0]
    }

    /// Short code used in job keys
    pub fn key_code(self) -> &'static str {
        match self {
            Self::Mysql => "MY",
            Self::Mariadb => "MA",
            Self::Mssql => "MS",
            Self::Postgres => "PG",
            Self::Sqlite => "SL",
        }
    }
}

impl fmt::Display for Dbms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// PHP database driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    /// Native MySQL driver
    Mysqli,
    /// PDO MySQL driver
    PdoMysql,
    /// Native SQL Server driver
    Sqlsrv,
    /// PDO SQL Server driver
    PdoSqlsrv,
}

impl Driver {
    /// Name passed to the test runner
    pub fn runner(self) -> &'static str {
        match self {
            Self::Mysqli => "mysqli",
            Self::PdoMysql => "pdo_mysql",
            Self::Sqlsrv => "sqlsrv",
            Self::PdoSqlsrv => "pdo_sqlsrv",
        }
    }

    /// Whether this is a PDO driver
    pub fn is_pdo(self) -> bool {
        matches!(self, Self::PdoMysql | Self::PdoSqlsrv)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.runner())
    }
}

/// Parallel acceptance backend jobs per matrix point
pub const ACCEPTANCE_JOBS: usize = 8;
/// Parallel functional MySQL jobs per matrix point and driver
pub const FUNCTIONAL_MYSQL_JOBS: usize = 6;
/// Parallel functional MSSQL jobs per matrix point and driver
pub const FUNCTIONAL_MSSQL_JOBS: usize = 16;
/// Parallel functional PostgreSQL jobs per matrix point
pub const FUNCTIONAL_PGSQL_JOBS: usize = 6;
/// Parallel functional SQLite jobs per matrix point
pub const FUNCTIONAL_SQLITE_JOBS: usize = 6;
/// Random order unit jobs per matrix point
pub const UNIT_RANDOM_ORDER_JOBS: usize = 2;

/// Maximum number of jobs per generated stage
pub const JOB_LIST_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(size) => size,
    None => unreachable!(),
};

/// Every (PHP version, composer stage) point, PHP version outermost
pub fn matrix_points() -> impl Iterator<Item = (PhpVersion, ComposerStage)> {
    PHP_VERSIONS
        .into_iter()
        .flat_map(|php| ComposerStage::ALL.into_iter().map(move |stage| (php, stage)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_php_version_formats() {
        let php = PHP_VERSIONS[0];
        assert_eq!(php.label(), "PHP72");
        assert_eq!(php.digits(), "72");
        assert_eq!(php.runner(), "7.2");
        assert_eq!(PHP_VERSIONS[2].runner(), "7.4");
    }

    #[test]
    fn test_composer_stage_numbers() {
        assert_eq!(ComposerStage::from_number(0), Some(ComposerStage::Locked));
        assert_eq!(ComposerStage::from_number(2), Some(ComposerStage::Min));
        assert_eq!(ComposerStage::from_number(3), None);
        assert_eq!(ComposerStage::Max.runner_suite(), "composerInstallMax");
    }

    #[test]
    fn test_dbms_default_version() {
        assert_eq!(Dbms::Mysql.default_version(), "5.5");
        assert_eq!(Dbms::Mssql.default_version(), "2012");
        assert_eq!(Dbms::Postgres.versions().len(), 7);
        assert!(Dbms::ALL.iter().all(|dbms| !dbms.versions().is_empty()));
    }

    #[test]
    fn test_driver_names() {
        assert_eq!(Driver::PdoSqlsrv.runner(), "pdo_sqlsrv");
        assert!(Driver::PdoMysql.is_pdo());
        assert!(!Driver::Mysqli.is_pdo());
    }

    #[test]
    fn test_matrix_points_order() {
        let points: Vec<_> = matrix_points().collect();
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], (PHP_VERSIONS[0], ComposerStage::Locked));
        assert_eq!(points[1], (PHP_VERSIONS[0], ComposerStage::Max));
        assert_eq!(points[3], (PHP_VERSIONS[1], ComposerStage::Locked));
    }

    #[test]
    fn test_job_list_size() {
        assert_eq!(JOB_LIST_SIZE.get(), 50);
    }
}
