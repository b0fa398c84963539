//! Ordered source → destination path prefix mapping.

use std::fmt;
use std::str::FromStr;

use super::error::RewriteError;

/// Separator between the two halves of a `SRC=DEST` directive.
const RULE_SEPARATOR: char = '=';

/// Normalizes a slash-separated path.
///
/// Repeated separators collapse, `.` segments disappear and leading or
/// trailing slashes are stripped. `..` segments are kept as written.
pub fn normalize_posix(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// A single `SRC=DEST` prefix relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// Normalized source prefix, never empty.
    pub source: String,
    /// Normalized destination prefix, never empty.
    pub dest: String,
}

impl RewriteRule {
    /// Returns the rewritten form of `path` if it lies under this rule's source.
    ///
    /// `path` must already be stripped of leading and trailing slashes.
    fn apply(&self, path: &str) -> Option<String> {
        if path == self.source {
            return Some(self.dest.clone());
        }

        let suffix = path
            .strip_prefix(self.source.as_str())?
            .strip_prefix('/')?
            .trim_start_matches('/');

        if suffix.is_empty() {
            Some(self.dest.clone())
        } else {
            Some(format!("{}/{suffix}", self.dest))
        }
    }
}

impl FromStr for RewriteRule {
    type Err = RewriteError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (source, dest) = raw
            .split_once(RULE_SEPARATOR)
            .ok_or_else(|| RewriteError::MissingSeparator(raw.to_string()))?;

        let source = normalize_posix(source.trim());
        let dest = normalize_posix(dest.trim());
        if source.is_empty() || dest.is_empty() {
            return Err(RewriteError::EmptyComponent(raw.to_string()));
        }

        Ok(Self { source, dest })
    }
}

impl fmt::Display for RewriteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RULE_SEPARATOR}{}", self.source, self.dest)
    }
}

/// Ordered prefix mapping; the first rule whose source matches wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    rules: Vec<RewriteRule>,
}

impl PrefixMap {
    /// Creates an empty mapping, under which every path is left alone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a list of `SRC=DEST` directives in order.
    ///
    /// Fails on the first malformed directive.
    pub fn parse<I, S>(entries: I) -> Result<Self, RewriteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for entry in entries {
            map.insert(entry.as_ref().parse()?);
        }
        Ok(map)
    }

    /// Adds a rule.
    ///
    /// A source that is already mapped keeps its position and takes the new
    /// destination.
    pub fn insert(&mut self, rule: RewriteRule) {
        match self.rules.iter_mut().find(|r| r.source == rule.source) {
            Some(existing) => existing.dest = rule.dest,
            None => self.rules.push(rule),
        }
    }

    /// Appends rules whose source is not mapped yet.
    ///
    /// Rules already present keep both their position and destination.
    pub fn append_defaults<I>(&mut self, rules: I)
    where
        I: IntoIterator<Item = RewriteRule>,
    {
        for rule in rules {
            if !self.rules.iter().any(|r| r.source == rule.source) {
                self.rules.push(rule);
            }
        }
    }

    /// Returns `true` when no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Number of configured rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Iterates over the rules in match order.
    pub fn rules(&self) -> impl Iterator<Item = &RewriteRule> {
        self.rules.iter()
    }

    /// Rewrites a relative path.
    ///
    /// Leading and trailing slashes are stripped before matching. Paths that
    /// no rule covers come back unchanged apart from that stripping.
    pub fn rewrite(&self, path: &str) -> String {
        let normalized = path.trim_matches('/');
        self.rules
            .iter()
            .find_map(|rule| rule.apply(normalized))
            .unwrap_or_else(|| normalized.to_string())
    }
}

impl Extend<RewriteRule> for PrefixMap {
    fn extend<T: IntoIterator<Item = RewriteRule>>(&mut self, iter: T) {
        for rule in iter {
            self.insert(rule);
        }
    }
}
