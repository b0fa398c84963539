//! Git command execution.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::utils::Settings;

/// Environment variable (or settings `env` key) naming the git executable.
pub const GIT_PROGRAM_ENV: &str = "PATCH_PORTER_GIT";

/// Default git executable.
const DEFAULT_GIT_PROGRAM: &str = "git";

/// Errors raised while running git.
#[derive(Error, Debug)]
pub enum GitError {
    /// The git executable could not be started.
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Git ran but exited unsuccessfully.
    #[error("git {args} exited with status {code}")]
    CommandFailed {
        /// Arguments git was invoked with.
        args: String,
        /// Exit status, forwarded as the process exit code.
        code: i32,
        /// Captured standard error, forwarded verbatim.
        stderr: String,
    },

    /// Git printed something that is not UTF-8.
    #[error("git {args} produced output that is not valid UTF-8")]
    InvalidOutput {
        /// Arguments git was invoked with.
        args: String,
    },
}

/// Runs git subcommands and returns their standard output.
pub trait GitRunner {
    /// Runs `git <args>` and returns its stdout with surrounding whitespace
    /// trimmed.
    fn run(&self, args: &[&str]) -> Result<String, GitError>;
}

/// [`GitRunner`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    work_dir: Option<PathBuf>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Runs `git` from `PATH` in the current directory.
    pub fn new() -> Self {
        Self {
            program: DEFAULT_GIT_PROGRAM.to_string(),
            work_dir: None,
        }
    }

    /// Runs the executable named by [`GIT_PROGRAM_ENV`], falling back to `git`.
    pub fn from_settings(settings: &Settings) -> Self {
        let program = settings
            .get_env_var(GIT_PROGRAM_ENV)
            .filter(|program| !program.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GIT_PROGRAM.to_string());
        Self::new().with_program(program)
    }

    /// Overrides the git executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Runs git inside `dir` instead of the current directory.
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Returns the git executable.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl GitRunner for GitCli {
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let joined = args.join(" ");
        debug!(program = %self.program, args = %joined, "Running git");

        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = &self.work_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| GitError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                args: joined,
                code: output.status.code().unwrap_or(1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let stdout =
            String::from_utf8(output.stdout).map_err(|_| GitError::InvalidOutput { args: joined })?;
        Ok(stdout.trim().to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn program_defaults_to_git() {
        assert_eq!(GitCli::new().program(), "git");
        assert_eq!(GitCli::default().program(), "git");
    }

    #[test]
    fn program_comes_from_settings_env() {
        let settings = Settings {
            env: HashMap::from([(GIT_PROGRAM_ENV.to_string(), "/opt/git/bin/git".to_string())]),
            ..Settings::default()
        };
        // The process environment wins over settings; only assert when unset.
        if std::env::var(GIT_PROGRAM_ENV).is_err() {
            assert_eq!(GitCli::from_settings(&settings).program(), "/opt/git/bin/git");
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let git = GitCli::new().with_program("patch-porter-no-such-git-binary");
        let err = git.run(&["status"]).unwrap_err();
        assert!(matches!(err, GitError::Spawn { .. }), "got {err:?}");
        assert!(err.to_string().contains("patch-porter-no-such-git-binary"));
    }

    #[test]
    fn command_failed_message_names_args() {
        let err = GitError::CommandFailed {
            args: "rev-list a..b".to_string(),
            code: 128,
            stderr: "fatal: bad revision\n".to_string(),
        };
        assert_eq!(err.to_string(), "git rev-list a..b exited with status 128");
    }
}
