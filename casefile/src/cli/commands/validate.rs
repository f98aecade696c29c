//! `validate`: check case files without playing them

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::case::{CaseLoader, LoaderOptions};
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::error::{CaseError, CasefileError};

/// Validation outcome for one file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    file: PathBuf,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    case_id: Option<String>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validate every file and print a report.
///
/// # Errors
///
/// Returns [`CaseError::ValidationFailed`] if any file failed, or a JSON
/// error if the report cannot be serialized.
pub fn run(args: &ValidateArgs) -> Result<(), CasefileError> {
    let loader = CaseLoader::new(LoaderOptions {
        strict: args.strict,
        ..LoaderOptions::default()
    });

    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| check_file(&loader, path))
        .collect();

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(CaseError::ValidationFailed { count: failed }.into());
    }
    Ok(())
}

fn check_file(loader: &CaseLoader, path: &Path) -> FileReport {
    tracing::info!(file = %path.display(), "validating case");
    match loader.load(path) {
        Ok(result) => FileReport {
            file: path.to_path_buf(),
            valid: true,
            case_id: Some(result.case.id().to_string()),
            errors: Vec::new(),
            warnings: result.warnings.iter().map(ToString::to_string).collect(),
        },
        Err(CaseError::ValidationError { errors, .. }) => FileReport {
            file: path.to_path_buf(),
            valid: false,
            case_id: None,
            errors: errors.iter().map(ToString::to_string).collect(),
            warnings: Vec::new(),
        },
        Err(e) => FileReport {
            file: path.to_path_buf(),
            valid: false,
            case_id: None,
            errors: vec![e.to_string()],
            warnings: Vec::new(),
        },
    }
}

fn print_human(report: &FileReport) {
    let status = if report.valid { "ok" } else { "FAILED" };
    match &report.case_id {
        Some(id) => println!("{}: {status} ({id})", report.file.display()),
        None => println!("{}: {status}", report.file.display()),
    }
    for error in &report.errors {
        println!("  {error}");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
}
