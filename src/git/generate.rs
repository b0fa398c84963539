//! Per-commit patch generation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::git::{GitError, GitRunner, TargetDirs, PATCH_NAME_HASH_LEN};
use crate::patch::{rewrite_patch, PrefixMap, SkippedChunk, TargetTree};

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Patch files written, in commit order.
    pub written: Vec<PathBuf>,
    /// Commits whose patch ended up empty and produced no file.
    pub empty: Vec<String>,
    /// Chunks dropped across all commits.
    pub warnings: Vec<SkippedChunk>,
}

/// Returns the file name of the `index`-th (1-based) patch.
pub fn patch_file_name(index: usize, commit: &str) -> String {
    let short = commit.get(..PATCH_NAME_HASH_LEN).unwrap_or(commit);
    format!("{index:04}-{short}.patch")
}

/// Writes commit ids one per line; an empty list yields an empty file.
pub fn write_commit_list(commits: &[String], path: &Path) -> Result<()> {
    let mut content = commits.join("\n");
    if !commits.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write commit list: {}", path.display()))
}

/// Produces one rewritten patch file per commit.
pub struct PatchGenerator<'a, R: ?Sized, T: ?Sized> {
    runner: &'a R,
    prefix_map: &'a PrefixMap,
    tree: &'a T,
    output_dir: PathBuf,
}

impl<'a, R, T> PatchGenerator<'a, R, T>
where
    R: GitRunner + ?Sized,
    T: TargetTree + ?Sized,
{
    /// Creates a generator writing into `output_dir`.
    pub fn new(
        runner: &'a R,
        prefix_map: &'a PrefixMap,
        tree: &'a T,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            prefix_map,
            tree,
            output_dir: output_dir.into(),
        }
    }

    /// Returns the raw `git format-patch` output for `commit`, limited to `dirs`.
    pub fn format_patch(&self, commit: &str, dirs: &TargetDirs) -> Result<String, GitError> {
        let mut args = vec![
            "format-patch",
            "--stdout",
            "--no-stat",
            "--binary",
            "-1",
            commit,
        ];
        let pathspecs = dirs.pathspecs();
        if !pathspecs.is_empty() {
            args.push("--");
            args.extend(pathspecs.iter().map(String::as_str));
        }
        self.runner.run(&args)
    }

    /// Writes a patch per commit, numbered from 1 in the order given.
    ///
    /// Every dropped chunk is reported on stderr as it is found. Commits
    /// whose rewritten patch is empty are skipped without a file.
    pub fn generate(&self, commits: &[String], dirs: &TargetDirs) -> Result<GenerationReport> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create patch directory: {}",
                self.output_dir.display()
            )
        })?;

        let mut report = GenerationReport::default();
        for (index, commit) in commits.iter().enumerate() {
            let raw = self.format_patch(commit, dirs)?;
            let rewritten = rewrite_patch(&raw, self.prefix_map, self.tree, commit);

            for warning in &rewritten.warnings {
                eprintln!("Warning: {warning}");
            }
            report.warnings.extend(rewritten.warnings.iter().cloned());

            if rewritten.is_empty() {
                debug!(%commit, "Nothing left to write");
                report.empty.push(commit.clone());
                continue;
            }

            let path = self.output_dir.join(patch_file_name(index + 1, commit));
            fs::write(&path, &rewritten.text)
                .with_context(|| format!("Failed to write patch: {}", path.display()))?;
            info!(%commit, path = %path.display(), "Wrote patch");
            report.written.push(path);
        }

        Ok(report)
    }
}
