//! Rewrite directive errors.

use thiserror::Error;

/// Errors raised while parsing `SRC=DEST` rewrite directives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The directive has no `=` separating source and destination.
    #[error("Invalid rewrite '{0}'; expected SRC=DEST")]
    MissingSeparator(String),

    /// One side of the directive is empty once slashes are trimmed.
    #[error("Invalid rewrite '{0}'; empty component")]
    EmptyComponent(String),
}
