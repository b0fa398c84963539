//! Selecting commits that touch a set of directories.

use tracing::debug;

use crate::git::{GitError, GitRunner};
use crate::patch::normalize_posix;

/// Directory entry that matches every path.
pub const WHOLE_TREE: &str = ".";

/// Normalized list of repository directories to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDirs {
    dirs: Vec<String>,
}

impl TargetDirs {
    /// Normalizes user-supplied directories.
    ///
    /// Empty entries and `.` stand for the whole tree.
    pub fn new<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dirs = dirs
            .into_iter()
            .map(|dir| {
                let normalized = normalize_posix(dir.as_ref().trim());
                if normalized.is_empty() {
                    WHOLE_TREE.to_string()
                } else {
                    normalized
                }
            })
            .collect();
        Self { dirs }
    }

    /// Returns the normalized directories.
    pub fn as_slice(&self) -> &[String] {
        &self.dirs
    }

    /// Returns `true` if `path` lies within any target directory.
    pub fn touches(&self, path: &str) -> bool {
        let path = path.trim();
        self.dirs.iter().any(|dir| {
            dir == WHOLE_TREE
                || path == dir
                || path
                    .strip_prefix(dir.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Pathspecs limiting `git format-patch` output, empty for the whole tree.
    pub fn pathspecs(&self) -> &[String] {
        if self.dirs.iter().all(|dir| dir == WHOLE_TREE) {
            &[]
        } else {
            self.dirs.as_slice()
        }
    }
}

/// Lists the files changed by `commit`.
pub fn changed_files<R>(runner: &R, commit: &str) -> Result<Vec<String>, GitError>
where
    R: GitRunner + ?Sized,
{
    let output = runner.run(&[
        "diff-tree",
        "--no-commit-id",
        "--name-only",
        "-r",
        "--root",
        commit,
    ])?;
    Ok(output
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Keeps the commits that change at least one file under `dirs`.
pub fn commits_touching<R>(
    runner: &R,
    commits: &[String],
    dirs: &TargetDirs,
) -> Result<Vec<String>, GitError>
where
    R: GitRunner + ?Sized,
{
    let mut matched = Vec::new();
    for commit in commits {
        let files = changed_files(runner, commit)?;
        if files.iter().any(|file| dirs.touches(file)) {
            matched.push(commit.clone());
        } else {
            debug!(%commit, "Commit does not touch target directories");
        }
    }
    Ok(matched)
}
