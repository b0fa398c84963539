use std::process;

use clap::Parser;
use patch_porter::git::GitError;
use patch_porter::Cli;

fn main() {
    // Initialize tracing subscriber with RUST_LOG environment variable support
    // Default to "warn" level if RUST_LOG is not set
    // Write to stderr so debug logs don't interfere with stdout output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        // A failing git invocation is forwarded as-is: its stderr verbatim
        // and its exit status as ours.
        let git_failure = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<GitError>());
        if let Some(GitError::CommandFailed { code, stderr, .. }) = git_failure {
            eprint!("{stderr}");
            process::exit(*code);
        }

        eprintln!("Error: {e}");

        // Print the full error chain if available
        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(1);
    }
}
