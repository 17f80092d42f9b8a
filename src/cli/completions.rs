//! `nightly-plan completions` - Shell completion scripts
//!
//! `-o` accepts a file or a directory; for a directory the script gets the
//! file name the shell looks for, e.g. `_nightly-plan` for zsh.

use anyhow::{Context, Result};
use clap_complete::{Generator, Shell};
use std::fs;
use std::path::{Path, PathBuf};

const BIN_NAME: &str = "nightly-plan";

pub fn generate_completions(shell: Shell) -> Result<String> {
    let mut cmd = super::build_cli();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);

    String::from_utf8(buf).context("Completion script is not valid UTF-8")
}

/// Where the script for `shell` goes when `output` is given
pub fn completion_path(shell: Shell, output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(shell.file_name(BIN_NAME))
    } else {
        output.to_path_buf()
    }
}

pub fn save_completions(completions: &str, shell: Shell, output: &Path) -> Result<PathBuf> {
    let path = completion_path(shell, output);
    fs::write(&path, completions)
        .with_context(|| format!("Failed to write completions to: {}", path.display()))?;
    tracing::info!(path = %path.display(), %shell, "wrote shell completions");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions_cover_subcommands() {
        let completions = generate_completions(Shell::Bash).unwrap();
        for command in ["publish", "render", "summary", "completions"] {
            assert!(completions.contains(command), "missing {command}");
        }
    }

    #[test]
    fn test_save_into_directory_uses_shell_file_name() {
        let dir = tempfile::tempdir().unwrap();

        let completions = generate_completions(Shell::Zsh).unwrap();
        let path = save_completions(&completions, Shell::Zsh, dir.path()).unwrap();

        assert_eq!(path, dir.path().join("_nightly-plan"));
        assert_eq!(fs::read_to_string(&path).unwrap(), completions);
    }

    #[test]
    fn test_save_to_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("np.fish");

        let path = save_completions("complete -c nightly-plan", Shell::Fish, &target).unwrap();

        assert_eq!(path, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "complete -c nightly-plan");
    }
}
