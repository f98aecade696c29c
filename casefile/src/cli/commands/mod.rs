//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod list;
pub mod play;
pub mod validate;
pub mod version;

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::case::{BuiltinLibrary, CaseLibrary, DirectoryLibrary, LoaderOptions};
use crate::cli::args::{Cli, Commands};
use crate::error::CasefileError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), CasefileError> {
    match cli.command {
        Commands::Play(args) => play::run(&args, cli.color, cancel).await,
        Commands::Validate(args) => validate::run(&args),
        Commands::List(args) => list::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Opens the directory library at `root`, or the built-in cases.
fn open_library(root: Option<&Path>) -> Result<Box<dyn CaseLibrary>, CasefileError> {
    match root {
        Some(root) if !root.is_dir() => Err(CasefileError::Usage(format!(
            "case library is not a directory: {}",
            root.display()
        ))),
        Some(root) => {
            tracing::info!(library = %root.display(), "using case library directory");
            Ok(Box::new(DirectoryLibrary::new(root, LoaderOptions::default())))
        }
        None => Ok(Box::new(BuiltinLibrary::default())),
    }
}
