//! # patch-porter
//!
//! Collects the commits between two revisions that touch a set of
//! directories and writes one patch per commit, optionally relocating the
//! paths inside each patch onto a tree with a different directory layout.
//!
//! ## Quick Start
//!
//! ```rust
//! use patch_porter::patch::{rewrite_patch, PrefixMap};
//!
//! let patch = "diff --git a/old/a.txt b/old/a.txt\n\
//!              --- a/old/a.txt\n\
//!              +++ b/old/a.txt\n";
//! let map = PrefixMap::parse(["old=new"]).unwrap();
//! let exists = |path: &str| path == "new/a.txt";
//!
//! let rewritten = rewrite_patch(patch, &map, &exists, "abc123");
//! assert!(rewritten.text.starts_with("diff --git a/new/a.txt b/new/a.txt"));
//! assert!(rewritten.warnings.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod data;
pub mod git;
pub mod patch;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of patch-porter.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
