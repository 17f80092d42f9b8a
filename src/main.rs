//! nightly-plan - builds and publishes the core nightly CI plan
//!
//! ## Commands
//!
//! - `nightly-plan` / `nightly-plan publish` - Publish plan and permissions
//! - `nightly-plan render` - Print the YAML (or JSON) documents
//! - `nightly-plan summary` - List stages, job counts and the matrix
//! - `nightly-plan completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Inspect the generated plan
//! nightly-plan summary
//!
//! # Write the import documents to a file
//! nightly-plan render -o nightly.yaml
//!
//! # Publish, reading username/password from .credentials
//! nightly-plan
//! ```

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if std::env::var("NIGHTLY_PLAN_VERBOSE").is_ok() {
                eprintln!("{e:?}");
            }
            ExitCode::FAILURE
        }
    }
}
