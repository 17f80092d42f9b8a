//! `nightly-plan summary` - Stages, job counts and the test matrix

use nightly_plan::nightly::{ComposerStage, Dbms, PHP_VERSIONS};
use nightly_plan::plan::Plan;
use std::fmt::Write;

pub fn summarize(plan: &Plan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", plan.name, plan.identifier());
    let _ = writeln!(out);
    let _ = writeln!(out, "Stages:");
    for stage in &plan.stages {
        let _ = writeln!(out, "  {:<20} {:>3} jobs", stage.name, stage.job_count());
    }
    let _ = writeln!(out, "  {:<20} {:>3} jobs", "Total", plan.job_count());

    let _ = writeln!(out);
    let _ = writeln!(out, "Matrix:");
    let php: Vec<_> = PHP_VERSIONS.iter().map(|v| v.runner()).collect();
    let _ = writeln!(out, "  {:<20} {}", "PHP", php.join(", "));
    let composer: Vec<_> = ComposerStage::ALL.iter().map(|s| s.label()).collect();
    let _ = writeln!(out, "  {:<20} {}", "Composer", composer.join(", "));
    for dbms in Dbms::ALL {
        let _ = writeln!(out, "  {:<20} {}", dbms.label(), dbms.versions().join(", "));
    }

    out
}
