//! Utility functions and helpers.

pub mod preflight;
pub mod settings;

pub use preflight::{
    check_collect_prerequisites, check_git_cli, check_git_repository, check_git_repository_at,
    check_target_root,
};
pub use settings::Settings;
