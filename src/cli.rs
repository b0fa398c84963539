//! CLI interface for patch-porter.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::patch::{PrefixMap, RewriteRule};
use crate::utils::Settings;

pub mod collect;
pub mod rewrite;

/// patch-porter: port directory-scoped history between differently laid-out trees.
#[derive(Parser)]
#[command(name = "patch-porter")]
#[command(
    about = "Collect commits touching a set of directories and write per-commit patches",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Settings file to use instead of $HOME/.patch-porter/settings.json.
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Lists commits touching directories and writes one patch per commit.
    Collect(collect::CollectCommand),
    /// Rewrites the paths of a single patch.
    Rewrite(rewrite::RewriteCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        let settings = load_settings(self.settings.as_deref())?;
        match self.command {
            Commands::Collect(collect_cmd) => collect_cmd.execute(&settings),
            Commands::Rewrite(rewrite_cmd) => rewrite_cmd.execute(&settings),
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Settings file not found: {}", path.display());
            }
            Settings::load_from_path(path)
        }
        None => Settings::load(),
    }
}

/// Builds the prefix map from command-line rules followed by settings rules.
///
/// A source given on the command line is never overridden by the settings
/// file.
pub(crate) fn build_prefix_map(rules: Vec<RewriteRule>, settings: &Settings) -> Result<PrefixMap> {
    let mut prefix_map = PrefixMap::new();
    prefix_map.extend(rules);
    prefix_map.append_defaults(
        settings
            .rewrite_rules()
            .context("Invalid rewrite in settings file")?,
    );
    Ok(prefix_map)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_rules_take_precedence_over_settings() {
        let settings = Settings {
            rewrites: vec!["a=from-settings".to_string(), "b=from-settings".to_string()],
            ..Settings::default()
        };
        let map = build_prefix_map(vec!["a=from-cli".parse().unwrap()], &settings).unwrap();

        assert_eq!(map.rewrite("a/x"), "from-cli/x");
        assert_eq!(map.rewrite("b/x"), "from-settings/x");
    }

    #[test]
    fn bad_settings_rule_is_a_configuration_error() {
        let settings = Settings {
            rewrites: vec!["=x".to_string()],
            ..Settings::default()
        };
        let err = build_prefix_map(Vec::new(), &settings).unwrap_err();
        assert!(err.to_string().contains("Invalid rewrite in settings file"));
    }

    #[test]
    fn explicit_missing_settings_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn collect_arguments_parse() {
        let cli = Cli::try_parse_from([
            "patch-porter",
            "collect",
            "v1",
            "v2",
            "gluten-ut/spark35",
            "shims",
            "--rewrite",
            "gluten-ut/spark35=gluten-ut/spark40",
            "-d",
            "out",
        ])
        .unwrap();

        let Commands::Collect(cmd) = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(cmd.start_commit, "v1");
        assert_eq!(cmd.end_commit, "v2");
        assert_eq!(cmd.directories, ["gluten-ut/spark35", "shims"]);
        assert_eq!(cmd.output, PathBuf::from("target_commits.txt"));
        assert_eq!(cmd.patch_dir, PathBuf::from("out"));
        assert_eq!(cmd.rewrites[0].source, "gluten-ut/spark35");
        assert!(!cmd.summary);
    }

    #[test]
    fn collect_requires_a_directory() {
        assert!(Cli::try_parse_from(["patch-porter", "collect", "v1", "v2"]).is_err());
    }

    #[test]
    fn malformed_rewrite_is_rejected_at_parse_time() {
        for bad in ["noequalsign", "=dest", "src=/"] {
            let result = Cli::try_parse_from([
                "patch-porter",
                "collect",
                "v1",
                "v2",
                "dir",
                "--rewrite",
                bad,
            ]);
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn rewrite_arguments_parse() {
        let cli = Cli::try_parse_from([
            "patch-porter",
            "--settings",
            "s.json",
            "rewrite",
            "change.patch",
            "--rewrite",
            "old=new",
            "--commit",
            "abc123",
        ])
        .unwrap();

        assert_eq!(cli.settings, Some(PathBuf::from("s.json")));
        let Commands::Rewrite(cmd) = cli.command else {
            panic!("expected rewrite");
        };
        assert_eq!(cmd.input, Some(PathBuf::from("change.patch")));
        assert_eq!(cmd.commit.as_deref(), Some("abc123"));
    }
}
