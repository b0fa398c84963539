//! Commit range collection.

use tracing::debug;

use crate::git::{GitError, GitRunner};

/// Resolves a revision to its full commit id.
pub fn resolve_commit<R>(runner: &R, rev: &str) -> Result<String, GitError>
where
    R: GitRunner + ?Sized,
{
    runner.run(&["rev-parse", "--verify", &format!("{rev}^{{commit}}")])
}

/// Returns the commits from `start` to `end`, both inclusive, oldest first.
///
/// Only commits on the ancestry path between the two are listed, so side
/// branches merged into the range are left out. Both endpoints are always
/// present, even when `start` is not an ancestor of `end`.
pub fn commits_between<R>(runner: &R, start: &str, end: &str) -> Result<Vec<String>, GitError>
where
    R: GitRunner + ?Sized,
{
    let start = resolve_commit(runner, start)?;
    let end = resolve_commit(runner, end)?;

    let revs = runner.run(&[
        "rev-list",
        "--ancestry-path",
        "--reverse",
        &format!("{start}..{end}"),
    ])?;
    let mut commits: Vec<String> = revs
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if commits.first() != Some(&start) {
        commits.insert(0, start);
    }
    if commits.last() != Some(&end) {
        commits.push(end);
    }

    debug!(count = commits.len(), "Collected commit range");
    Ok(commits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::git::test_utils::ScriptedGit;

    const A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const C: &str = "cccccccccccccccccccccccccccccccccccccccc";

    fn resolving(git: ScriptedGit) -> ScriptedGit {
        git.on("rev-parse --verify v1^{commit}", A)
            .on("rev-parse --verify main^{commit}", C)
    }

    #[test]
    fn range_includes_start_and_end() {
        let git = resolving(ScriptedGit::new())
            .on(&format!("rev-list --ancestry-path --reverse {A}..{C}"), &format!("{B}\n{C}\n"));

        let commits = commits_between(&git, "v1", "main").unwrap();
        assert_eq!(commits, [A, B, C]);
        assert_eq!(
            git.calls(),
            [
                "rev-parse --verify v1^{commit}".to_string(),
                "rev-parse --verify main^{commit}".to_string(),
                format!("rev-list --ancestry-path --reverse {A}..{C}"),
            ]
        );
    }

    #[test]
    fn unrelated_endpoints_still_listed() {
        let git = resolving(ScriptedGit::new())
            .on(&format!("rev-list --ancestry-path --reverse {A}..{C}"), "");

        assert_eq!(commits_between(&git, "v1", "main").unwrap(), [A, C]);
    }

    #[test]
    fn same_start_and_end_listed_once() {
        let git = ScriptedGit::new()
            .on("rev-parse --verify v1^{commit}", A)
            .on(&format!("rev-list --ancestry-path --reverse {A}..{A}"), "");

        assert_eq!(commits_between(&git, "v1", "v1").unwrap(), [A]);
    }

    #[test]
    fn unknown_revision_propagates_git_failure() {
        let git = ScriptedGit::new().fail(
            "rev-parse --verify nope^{commit}",
            128,
            "fatal: Needed a single revision\n",
        );

        let err = commits_between(&git, "nope", "main").unwrap_err();
        match err {
            GitError::CommandFailed { code, stderr, .. } => {
                assert_eq!(code, 128);
                assert_eq!(stderr, "fatal: Needed a single revision\n");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
