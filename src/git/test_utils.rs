//! Shared test utilities for the `git` module.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::git::{GitError, GitRunner};

/// Scripted git runner keyed by the space-joined argument list.
///
/// Unscripted invocations fail with exit status 128, the way git rejects an
/// unknown revision. Every invocation is recorded so tests can assert on the
/// exact commands issued.
#[derive(Default)]
pub(crate) struct ScriptedGit {
    responses: HashMap<String, Result<String, (i32, String)>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful invocation.
    pub(crate) fn on(mut self, args: &str, stdout: &str) -> Self {
        self.responses
            .insert(args.to_string(), Ok(stdout.trim().to_string()));
        self
    }

    /// Scripts a failing invocation.
    pub(crate) fn fail(mut self, args: &str, code: i32, stderr: &str) -> Self {
        self.responses
            .insert(args.to_string(), Err((code, stderr.to_string())));
        self
    }

    /// Returns every invocation so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl GitRunner for ScriptedGit {
    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let joined = args.join(" ");
        self.calls.borrow_mut().push(joined.clone());

        match self.responses.get(&joined) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err((code, stderr))) => Err(GitError::CommandFailed {
                args: joined,
                code: *code,
                stderr: stderr.clone(),
            }),
            None => Err(GitError::CommandFailed {
                stderr: format!("fatal: unscripted invocation: git {joined}\n"),
                args: joined,
                code: 128,
            }),
        }
    }
}
