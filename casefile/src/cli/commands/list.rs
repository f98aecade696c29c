//! `list`: show the cases a library offers

use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::CasefileError;

use super::open_library;

/// Print the case index of the selected library.
///
/// # Errors
///
/// Returns a usage error if `--library` is not a directory, a library error
/// if the index cannot be read, or a JSON error if it cannot be serialized.
pub fn run(args: &ListArgs) -> Result<(), CasefileError> {
    let library = open_library(args.library.as_deref())?;
    let cases = library.fetch_case_index()?;
    tracing::info!(count = cases.len(), "listing cases");

    match args.format {
        OutputFormat::Human => {
            let width = cases.iter().map(|c| c.id.len()).max().unwrap_or(0);
            for case in &cases {
                println!("{:<width$}  {}", case.id, case.title);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&cases)?);
        }
    }
    Ok(())
}
