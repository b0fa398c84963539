//! Patch path rewriting.
//!
//! Relocates the paths referenced by a `git format-patch` patch onto a tree
//! with a different directory layout, dropping the per-file chunks whose
//! relocated target does not exist there.

pub mod error;
pub mod prefix_map;
pub mod rewriter;

pub use error::RewriteError;
pub use prefix_map::{normalize_posix, PrefixMap, RewriteRule};
pub use rewriter::{rewrite_patch, RewrittenPatch, SkippedChunk, TargetTree, WorkingTree};
