//! Git plumbing: running git, walking the commit range, filtering commits
//! and generating per-commit patches.

pub mod generate;
pub mod range;
pub mod runner;
pub mod touch;

#[cfg(test)]
pub(crate) mod test_utils;

pub use generate::{patch_file_name, write_commit_list, GenerationReport, PatchGenerator};
pub use range::{commits_between, resolve_commit};
pub use runner::{GitCli, GitError, GitRunner, GIT_PROGRAM_ENV};
pub use touch::{changed_files, commits_touching, TargetDirs, WHOLE_TREE};

/// Number of hex characters of the commit id used in patch file names.
pub const PATCH_NAME_HASH_LEN: usize = 12;
