//! Preflight validation checks for early failure detection
//!
//! Commands call these before walking any history so that a missing git
//! installation, a wrong working directory or a bad target root fail fast
//! with a clear message.

use std::path::Path;

use anyhow::{bail, Context, Result};
use git2::Repository;

use crate::git::{GitError, GitRunner};

/// Validate we're inside a git repository
///
/// Opens the repository containing the current directory without loading
/// any commit data.
pub fn check_git_repository() -> Result<()> {
    check_git_repository_at(".")
}

/// Validate `path` lies inside a git repository
pub fn check_git_repository_at<P: AsRef<Path>>(path: P) -> Result<()> {
    Repository::discover(path.as_ref()).context(
        "Not in a git repository. Please run this command from within a git repository.",
    )?;
    Ok(())
}

/// Validate the git executable can be run
pub fn check_git_cli<R>(runner: &R) -> Result<()>
where
    R: GitRunner + ?Sized,
{
    match runner.run(&["--version"]) {
        Ok(_) => Ok(()),
        Err(GitError::Spawn { program, .. }) => bail!(
            "Git executable '{program}' is not installed or not in PATH.\n\
             Install git or point PATCH_PORTER_GIT at it."
        ),
        Err(err) => Err(err).context("Failed to run git --version"),
    }
}

/// Validate the tree patches are ported onto is an existing directory
pub fn check_target_root(path: &Path) -> Result<()> {
    if !path.is_dir() {
        bail!(
            "Target root {} is not a directory.\n\
             Pass --target-root pointing at the checkout the patches are meant for.",
            path.display()
        );
    }
    Ok(())
}

/// Combined preflight check for the collect command
///
/// Validates:
/// - Git repository access
/// - Git executable availability
/// - Target root existence
pub fn check_collect_prerequisites<R>(runner: &R, target_root: &Path) -> Result<()>
where
    R: GitRunner + ?Sized,
{
    check_git_repository()?;
    check_git_cli(runner)?;
    check_target_root(target_root)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::git::test_utils::ScriptedGit;
    use crate::git::GitCli;

    #[test]
    fn repository_discovered_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        assert!(check_git_repository_at(&nested).is_ok());
    }

    #[test]
    fn plain_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_git_repository_at(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Not in a git repository"));
    }

    #[test]
    fn missing_git_binary_is_reported() {
        let git = GitCli::new().with_program("patch-porter-no-such-git-binary");
        let err = check_git_cli(&git).unwrap_err();
        assert!(err.to_string().contains("is not installed or not in PATH"));
    }

    #[test]
    fn working_git_passes() {
        let git = ScriptedGit::new().on("--version", "git version 2.43.0");
        assert!(check_git_cli(&git).is_ok());
    }

    #[test]
    fn target_root_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_target_root(dir.path()).is_ok());

        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(check_target_root(&file).is_err());
        assert!(check_target_root(&dir.path().join("missing")).is_err());
    }
}
