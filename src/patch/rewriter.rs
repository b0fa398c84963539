//! Path rewriting for a single commit's multi-file patch.
//!
//! The patch is scanned line by line with a two-state scanner. Lines before
//! the first `diff --git` header form the preamble and are copied verbatim.
//! Each header opens a new pending chunk whose path references are rewritten
//! through a [`PrefixMap`]. When the next header arrives, or the input ends,
//! the pending chunk is flushed: it is kept only if its rewritten target
//! exists in the [`TargetTree`], otherwise it is dropped and reported as a
//! [`SkippedChunk`].

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::prefix_map::PrefixMap;

/// Marker that begins a per-file section.
const FILE_HEADER_MARKER: &str = "diff --git ";

/// Marker of the line naming the pre-image path.
const OLD_PATH_MARKER: &str = "--- ";

/// Marker of the line naming the post-image path.
const NEW_PATH_MARKER: &str = "+++ ";

/// Marker that begins a hunk.
const HUNK_MARKER: &str = "@@";

/// Marker that begins a binary patch body.
const BINARY_PATCH_MARKER: &str = "GIT binary patch";

/// Path used by git for the missing side of an added or deleted file.
const NULL_DEVICE: &str = "/dev/null";

/// Prefixes git puts in front of the pre-image and post-image paths.
const SIDE_MARKERS: [&str; 2] = ["a/", "b/"];

/// Boundary between the two paths of a `diff --git a/… b/…` header.
const HEADER_PATH_BOUNDARY: &str = " b/";

/// Terminator git appends to `---`/`+++` paths that contain a space.
const PATH_LINE_TERMINATOR: char = '\t';

/// Extended header lines whose argument is a bare path.
const PATH_ANNOTATIONS: [&str; 4] = ["rename from ", "rename to ", "copy from ", "copy to "];

/// Placeholder reported for a chunk whose target could not be determined.
pub const UNKNOWN_PATH: &str = "unknown path";

/// Answers whether a relative path exists in the tree a patch is ported onto.
pub trait TargetTree {
    /// Returns `true` if `relative` exists in the tree.
    fn contains(&self, relative: &str) -> bool;
}

impl<F> TargetTree for F
where
    F: Fn(&str) -> bool,
{
    fn contains(&self, relative: &str) -> bool {
        self(relative)
    }
}

/// A checked-out directory on disk.
#[derive(Debug, Clone)]
pub struct WorkingTree {
    root: PathBuf,
}

impl WorkingTree {
    /// Creates a tree rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TargetTree for WorkingTree {
    fn contains(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }
}

/// A chunk dropped because its rewritten target is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChunk {
    /// Commit the patch was generated from.
    pub commit: String,
    /// Rewritten target path, if one was found in the chunk.
    pub path: Option<String>,
}

impl SkippedChunk {
    /// Returns the target path, or a placeholder when it is unknown.
    pub fn path_or_unknown(&self) -> &str {
        self.path.as_deref().unwrap_or(UNKNOWN_PATH)
    }
}

impl fmt::Display for SkippedChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "skipping commit {} file {} (missing target)",
            self.commit,
            self.path_or_unknown()
        )
    }
}

/// Result of rewriting one commit's patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenPatch {
    /// Rewritten patch text; empty when every chunk was dropped.
    pub text: String,
    /// Chunks dropped along the way.
    pub warnings: Vec<SkippedChunk>,
}

impl RewrittenPatch {
    /// Returns `true` when there is nothing worth writing out.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Rewrites the paths of `patch_text` and drops chunks whose target is missing.
///
/// With an empty `prefix_map` the text is returned as is, apart from its
/// trailing newlines being normalized to exactly one.
pub fn rewrite_patch<T>(
    patch_text: &str,
    prefix_map: &PrefixMap,
    tree: &T,
    commit: &str,
) -> RewrittenPatch
where
    T: TargetTree + ?Sized,
{
    if prefix_map.is_empty() {
        return RewrittenPatch {
            text: with_single_trailing_newline(patch_text),
            warnings: Vec::new(),
        };
    }

    let mut scanner = Scanner::new(prefix_map, tree, commit);
    // Only `\n` separates lines; a `\r` belongs to the patched content.
    for line in patch_text.split_terminator('\n') {
        scanner.feed(line);
    }
    scanner.finish()
}

fn with_single_trailing_newline(text: &str) -> String {
    format!("{}\n", text.trim_end_matches('\n'))
}

/// Splits an `a/` or `b/` marker off a path token.
fn split_side_marker(token: &str) -> (&str, &str) {
    SIDE_MARKERS
        .iter()
        .find_map(|marker| token.strip_prefix(marker).map(|rest| (*marker, rest)))
        .unwrap_or(("", token))
}

/// Which side of the diff a `---`/`+++` line names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Old,
    New,
}

/// One file's lines, rewritten as they arrive.
#[derive(Debug)]
struct PendingChunk {
    lines: Vec<String>,
    target: Option<String>,
    /// Set once a hunk or binary body starts; body lines are never rewritten.
    in_body: bool,
}

impl PendingChunk {
    fn new(header: String) -> Self {
        Self {
            lines: vec![header],
            target: None,
            in_body: false,
        }
    }

    fn push(&mut self, line: &str, prefix_map: &PrefixMap) {
        let rewritten = if self.in_body {
            None
        } else if line.starts_with(HUNK_MARKER) || line.starts_with(BINARY_PATCH_MARKER) {
            self.in_body = true;
            None
        } else if let Some(path) = line.strip_prefix(OLD_PATH_MARKER) {
            self.rewrite_path_line(OLD_PATH_MARKER, path, Side::Old, prefix_map)
        } else if let Some(path) = line.strip_prefix(NEW_PATH_MARKER) {
            self.rewrite_path_line(NEW_PATH_MARKER, path, Side::New, prefix_map)
        } else {
            rewrite_annotation(line, prefix_map)
        };

        self.lines
            .push(rewritten.unwrap_or_else(|| line.to_string()));
    }

    fn rewrite_path_line(
        &mut self,
        marker: &str,
        path: &str,
        side: Side,
        prefix_map: &PrefixMap,
    ) -> Option<String> {
        let (path, terminator) = match path.strip_suffix(PATH_LINE_TERMINATOR) {
            Some(stripped) => (stripped, "\t"),
            None => (path, ""),
        };
        if path == NULL_DEVICE {
            return None;
        }

        let (side_marker, relative) = split_side_marker(path);
        let rewritten = prefix_map.rewrite(relative);
        if side == Side::New || self.target.is_none() {
            self.target = Some(rewritten.clone());
        }

        Some(format!("{marker}{side_marker}{rewritten}{terminator}"))
    }
}

fn rewrite_annotation(line: &str, prefix_map: &PrefixMap) -> Option<String> {
    PATH_ANNOTATIONS.iter().find_map(|keyword| {
        line.strip_prefix(keyword)
            .map(|path| format!("{keyword}{}", prefix_map.rewrite(path.trim())))
    })
}

fn rewrite_file_header(line: &str, prefix_map: &PrefixMap) -> String {
    if let Some((old_path, new_path)) = split_header_paths(line) {
        return format!(
            "{FILE_HEADER_MARKER}{}{}{HEADER_PATH_BOUNDARY}{}",
            SIDE_MARKERS[0],
            prefix_map.rewrite(old_path),
            prefix_map.rewrite(new_path)
        );
    }

    let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if tokens.len() >= 4 {
        for token in &mut tokens[2..4] {
            let (marker, relative) = split_side_marker(token);
            if !marker.is_empty() {
                *token = format!("{marker}{}", prefix_map.rewrite(relative));
            }
        }
    }
    tokens.join(" ")
}

/// Splits `diff --git a/<old> b/<new>` into its two paths.
///
/// Paths may contain spaces, so the split happens at a ` b/` boundary. When
/// several boundaries exist, the one leaving identical paths on both sides
/// wins, otherwise the first one.
fn split_header_paths(line: &str) -> Option<(&str, &str)> {
    let paths = line
        .strip_prefix(FILE_HEADER_MARKER)?
        .strip_prefix(SIDE_MARKERS[0])?;

    let mut boundaries = paths
        .match_indices(HEADER_PATH_BOUNDARY)
        .map(|(index, _)| (&paths[..index], &paths[index + HEADER_PATH_BOUNDARY.len()..]));
    let first = boundaries.next()?;
    Some(
        std::iter::once(first)
            .chain(boundaries)
            .find(|(old_path, new_path)| old_path == new_path)
            .unwrap_or(first),
    )
}

#[derive(Debug)]
enum ScanState {
    Preamble,
    InChunk(PendingChunk),
}

/// Accumulates the preamble, kept chunks and warnings over one scan.
struct Scanner<'a, T: ?Sized> {
    prefix_map: &'a PrefixMap,
    tree: &'a T,
    commit: &'a str,
    state: ScanState,
    preamble: Vec<String>,
    kept: Vec<Vec<String>>,
    warnings: Vec<SkippedChunk>,
}

impl<'a, T> Scanner<'a, T>
where
    T: TargetTree + ?Sized,
{
    fn new(prefix_map: &'a PrefixMap, tree: &'a T, commit: &'a str) -> Self {
        Self {
            prefix_map,
            tree,
            commit,
            state: ScanState::Preamble,
            preamble: Vec::new(),
            kept: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        if line.starts_with(FILE_HEADER_MARKER) {
            self.flush();
            let header = rewrite_file_header(line, self.prefix_map);
            self.state = ScanState::InChunk(PendingChunk::new(header));
            return;
        }

        match &mut self.state {
            ScanState::Preamble => self.preamble.push(line.to_string()),
            ScanState::InChunk(chunk) => chunk.push(line, self.prefix_map),
        }
    }

    fn flush(&mut self) {
        let ScanState::InChunk(chunk) = std::mem::replace(&mut self.state, ScanState::Preamble)
        else {
            return;
        };

        match chunk.target {
            Some(target) if self.tree.contains(&target) => {
                debug!(commit = self.commit, %target, "Keeping chunk");
                self.kept.push(chunk.lines);
            }
            target => {
                debug!(commit = self.commit, ?target, "Dropping chunk with missing target");
                self.warnings.push(SkippedChunk {
                    commit: self.commit.to_string(),
                    path: target,
                });
            }
        }
    }

    fn finish(mut self) -> RewrittenPatch {
        self.flush();

        if self.kept.is_empty() {
            return RewrittenPatch {
                text: String::new(),
                warnings: self.warnings,
            };
        }

        let mut lines = self.preamble;
        if lines.last().is_some_and(|line| !line.is_empty()) {
            lines.push(String::new());
        }
        lines.extend(self.kept.into_iter().flatten());

        RewrittenPatch {
            text: with_single_trailing_newline(&lines.join("\n")),
            warnings: self.warnings,
        }
    }
}
