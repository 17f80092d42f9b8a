//! CLI for the nightly plan
//!
//! - `publish`: build the plan and send it to the plan server (default)
//! - `render`: print the documents that would be published
//! - `summary`: list stages with job counts and the test matrix
//! - `completions`: generate shell completions

pub mod completions;
pub mod publish;
pub mod render;
pub mod summary;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nightly_plan::infrastructure::{Config, init_logging};
use nightly_plan::nightly::NightlyPlan;
use std::path::PathBuf;

/// CLI arguments for nightly-plan
#[derive(Parser, Debug)]
#[command(name = "nightly-plan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to nightly-plan.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the plan and publish it with its permissions
    Publish {
        /// Render and log the documents without sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Render plan and permissions documents
    Render {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = FormatArg::Yaml)]
        format: FormatArg,
    },

    /// Print stages, job counts and the test matrix
    Summary,

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file or directory (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Build the CLI command for completion generation
pub fn build_cli() -> clap::Command {
    use clap::CommandFactory;
    Args::command()
}

/// Log level of `config`, or of the defaults plus environment when the
/// configuration could not be loaded
fn log_level(config: Option<&Config>) -> String {
    match config {
        Some(config) => config.log_level.clone(),
        None => {
            Config::default()
                .with_env_overrides(|name| std::env::var(name).ok())
                .log_level
        }
    }
}

/// Parse and execute CLI arguments
pub fn run() -> Result<()> {
    let args = Args::parse();

    // Only publishing needs a valid configuration
    let config = Config::load(args.config.as_deref());
    init_logging(&log_level(config.as_ref().ok()));

    let generator = NightlyPlan::new();

    match args.command.unwrap_or(Command::Publish { dry_run: false }) {
        Command::Publish { dry_run } => {
            let config = config.context("Failed to load configuration")?;
            publish::publish_nightly(&generator, &config, dry_run)?;
        }
        Command::Render { output, format } => {
            let format = match format {
                FormatArg::Yaml => render::RenderFormat::Yaml,
                FormatArg::Json => render::RenderFormat::Json,
            };
            let rendered = render::render_nightly(&generator, format)?;

            if let Some(output_path) = output {
                render::save_render(&rendered, &output_path)?;
            } else {
                print!("{rendered}");
            }
        }
        Command::Summary => {
            let plan = generator.create_plan().context("Failed to build plan")?;
            print!("{}", summary::summarize(&plan));
        }
        Command::Completions { shell, output } => {
            use clap_complete::Shell;

            let shell_enum = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
            };

            let completions = completions::generate_completions(shell_enum)?;

            if let Some(output_path) = output {
                completions::save_completions(&completions, shell_enum, &output_path)?;
            } else {
                println!("{completions}");
            }
        }
    }

    Ok(())
}
