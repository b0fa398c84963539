//! Rewrite command: ports the paths of a single existing patch.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::patch::{rewrite_patch, RewriteRule, RewrittenPatch, WorkingTree};
use crate::utils::{check_target_root, Settings};

/// Commit label used in warnings when none is given.
const DEFAULT_COMMIT_LABEL: &str = "-";

/// Rewrite command options.
#[derive(Parser)]
pub struct RewriteCommand {
    /// Patch to rewrite; reads standard input when omitted.
    #[arg(value_name = "PATCH_FILE")]
    pub input: Option<PathBuf>,

    /// Rewrites a path prefix (e.g. old/dir=new/dir). Repeatable.
    #[arg(long = "rewrite", value_name = "SRC=DEST")]
    pub rewrites: Vec<RewriteRule>,

    /// Commit id named in warnings.
    #[arg(long, value_name = "COMMIT")]
    pub commit: Option<String>,

    /// Tree checked for rewritten targets; defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub target_root: Option<PathBuf>,

    /// File receiving the rewritten patch; defaults to standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl RewriteCommand {
    /// Executes the rewrite command.
    pub fn execute(self, settings: &Settings) -> Result<()> {
        let prefix_map = super::build_prefix_map(self.rewrites, settings)?;
        let target_root = match self.target_root {
            Some(root) => root,
            None => env::current_dir().context("Failed to determine current directory")?,
        };
        check_target_root(&target_root)?;

        let patch_text = match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read patch: {}", path.display()))?,
            None => {
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .context("Failed to read patch from standard input")?;
                buffer
            }
        };

        let commit = self.commit.as_deref().unwrap_or(DEFAULT_COMMIT_LABEL);
        let tree = WorkingTree::new(target_root);
        let rewritten = rewrite_patch(&patch_text, &prefix_map, &tree, commit);
        emit(&rewritten, self.output.as_ref())
    }
}

fn emit(rewritten: &RewrittenPatch, output: Option<&PathBuf>) -> Result<()> {
    for warning in &rewritten.warnings {
        eprintln!("Warning: {warning}");
    }

    if rewritten.is_empty() {
        info!("Every chunk was dropped; nothing to write");
        return Ok(());
    }

    match output {
        Some(path) => fs::write(path, &rewritten.text)
            .with_context(|| format!("Failed to write patch: {}", path.display())),
        None => {
            print!("{}", rewritten.text);
            Ok(())
        }
    }
}
