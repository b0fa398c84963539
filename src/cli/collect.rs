//! Collect command: lists matching commits and writes per-commit patches.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::data::{to_yaml, RangeInfo, RunSummary};
use crate::git::{
    commits_between, commits_touching, write_commit_list, GitCli, PatchGenerator, TargetDirs,
};
use crate::patch::{RewriteRule, WorkingTree};
use crate::utils::{check_collect_prerequisites, Settings};

/// Collect command options.
#[derive(Parser)]
pub struct CollectCommand {
    /// Starting commit (inclusive).
    #[arg(value_name = "START")]
    pub start_commit: String,

    /// Ending commit (inclusive).
    #[arg(value_name = "END")]
    pub end_commit: String,

    /// One or more target directories relative to the repository root.
    #[arg(value_name = "DIR", required = true, num_args = 1..)]
    pub directories: Vec<String>,

    /// File receiving the matching commit ids, one per line.
    #[arg(short, long, value_name = "FILE", default_value = "target_commits.txt")]
    pub output: PathBuf,

    /// Directory receiving the per-commit patches.
    #[arg(short = 'd', long, value_name = "DIR", default_value = "patches")]
    pub patch_dir: PathBuf,

    /// Rewrites a path prefix inside generated patches
    /// (e.g. gluten-ut/spark35=gluten-ut/spark40). Repeatable.
    #[arg(long = "rewrite", value_name = "SRC=DEST")]
    pub rewrites: Vec<RewriteRule>,

    /// Tree checked for rewritten targets; defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub target_root: Option<PathBuf>,

    /// Prints a YAML summary of the run to stdout.
    #[arg(long)]
    pub summary: bool,
}

impl CollectCommand {
    /// Executes the collect command.
    pub fn execute(self, settings: &Settings) -> Result<()> {
        let prefix_map = super::build_prefix_map(self.rewrites, settings)?;
        let git = GitCli::from_settings(settings);
        let target_root = match self.target_root {
            Some(root) => root,
            None => env::current_dir().context("Failed to determine current directory")?,
        };

        // Preflight check: validate everything before walking history
        check_collect_prerequisites(&git, &target_root)?;

        let dirs = TargetDirs::new(&self.directories);
        let commits = commits_between(&git, &self.start_commit, &self.end_commit)?;
        info!(count = commits.len(), "Scanning commits");

        let matched = commits_touching(&git, &commits, &dirs)?;
        write_commit_list(&matched, &self.output)?;
        info!(
            count = matched.len(),
            output = %self.output.display(),
            "Wrote matching commits"
        );

        let mut summary = RunSummary::new(
            RangeInfo {
                start: self.start_commit,
                end: self.end_commit,
            },
            dirs.as_slice().to_vec(),
            prefix_map.rules().map(ToString::to_string).collect(),
        );
        summary.scanned = commits.len();
        summary.matched.clone_from(&matched);

        if !matched.is_empty() {
            let tree = WorkingTree::new(target_root);
            let generator = PatchGenerator::new(&git, &prefix_map, &tree, &self.patch_dir);
            let report = generator.generate(&matched, &dirs)?;
            info!(
                written = report.written.len(),
                skipped = report.empty.len(),
                "Generated patches"
            );
            summary.record(&report);
        }

        if self.summary {
            print!("{}", to_yaml(&summary)?);
        }

        Ok(())
    }
}
