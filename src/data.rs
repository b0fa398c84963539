//! Run summary output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::git::GenerationReport;

/// Version information for the patch-porter tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version of patch-porter that produced the summary.
    pub patch_porter: String,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            patch_porter: crate::VERSION.to_string(),
        }
    }
}

/// Revisions bounding a collect run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeInfo {
    /// First commit of the range, inclusive.
    pub start: String,
    /// Last commit of the range, inclusive.
    pub end: String,
}

/// Summary of a collect run, printed as YAML with `--summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Version information.
    pub versions: VersionInfo,
    /// Revisions the range was taken from.
    pub range: RangeInfo,
    /// Normalized target directories.
    pub directories: Vec<String>,
    /// Active rewrite rules in match order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub rewrites: Vec<String>,
    /// Number of commits in the range.
    pub scanned: usize,
    /// Commits touching the target directories.
    pub matched: Vec<String>,
    /// Patch files written.
    pub patches: Vec<String>,
    /// Matched commits that produced no patch after rewriting.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub empty: Vec<String>,
    /// Dropped chunks.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// Creates a summary with no generation results yet.
    pub fn new(range: RangeInfo, directories: Vec<String>, rewrites: Vec<String>) -> Self {
        Self {
            versions: VersionInfo::default(),
            range,
            directories,
            rewrites,
            scanned: 0,
            matched: Vec::new(),
            patches: Vec::new(),
            empty: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Records the outcome of patch generation.
    pub fn record(&mut self, report: &GenerationReport) {
        self.patches = report
            .written
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        self.empty.clone_from(&report.empty);
        self.warnings = report.warnings.iter().map(ToString::to_string).collect();
    }
}

/// Serializes a value to YAML.
pub fn to_yaml<T: Serialize>(data: &T) -> Result<String> {
    serde_yaml::to_string(data).context("Failed to serialize to YAML")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::patch::SkippedChunk;

    fn summary() -> RunSummary {
        RunSummary::new(
            RangeInfo {
                start: "v1".to_string(),
                end: "v2".to_string(),
            },
            vec!["old".to_string()],
            vec!["old=new".to_string()],
        )
    }

    #[test]
    fn record_copies_report() {
        let mut summary = summary();
        summary.record(&GenerationReport {
            written: vec![PathBuf::from("patches/0001-abc.patch")],
            empty: vec!["def".to_string()],
            warnings: vec![SkippedChunk {
                commit: "def".to_string(),
                path: Some("new/x".to_string()),
            }],
        });

        assert_eq!(summary.patches, ["patches/0001-abc.patch"]);
        assert_eq!(summary.empty, ["def"]);
        assert_eq!(
            summary.warnings,
            ["skipping commit def file new/x (missing target)"]
        );
    }

    #[test]
    fn yaml_round_trips_and_omits_empty_lists() {
        let mut summary = summary();
        summary.rewrites.clear();
        let yaml = to_yaml(&summary).unwrap();

        assert!(yaml.contains("patch_porter:"));
        assert!(!yaml.contains("rewrites:"));
        assert!(!yaml.contains("warnings:"));

        let parsed: RunSummary = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.range.start, "v1");
        assert_eq!(parsed.directories, ["old"]);
    }
}
