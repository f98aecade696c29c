//! Case loader
//!
//! This module implements the case loading pipeline:
//! 1. Size limit check
//! 2. BOM stripping and empty-document check
//! 3. YAML parsing (JSON is accepted as a YAML subset)
//! 4. Deserialization to [`CaseDefinition`]
//! 5. Validation
//! 6. Rules resolution
//! 7. Freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use casefile_core::case::{Case, CaseDefinition};
use casefile_core::error::{CaseError, ValidationIssue};

use super::validation::Validator;

/// Path reported for in-memory sources.
const INLINE_SOURCE: &str = "<inline>";

// ============================================================================
// Public API
// ============================================================================

/// Options for the case loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Promote validation warnings to errors.
    pub strict: bool,

    /// Limits for case file size.
    pub limits: CaseLimits,
}

/// Limits for case files to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct CaseLimits {
    /// Maximum case file size in bytes.
    pub max_case_size: usize,
}

impl Default for CaseLimits {
    fn default() -> Self {
        Self {
            max_case_size: env_or("CASEFILE_MAX_CASE_SIZE", 4 * 1024 * 1024),
        }
    }
}

/// Result of loading a case file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded, validated and frozen case.
    pub case: Arc<Case>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during case loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<ValidationIssue> for LoadWarning {
    fn from(issue: ValidationIssue) -> Self {
        Self {
            message: issue.message,
            location: Some(issue.path),
        }
    }
}

/// Case loader.
#[derive(Debug, Default)]
pub struct CaseLoader {
    options: LoaderOptions,
}

impl CaseLoader {
    /// Creates a new case loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Creates a new case loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Loads a case file and returns the frozen case.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or exceeds the size limit
    /// - Parsing or deserialization fails
    /// - Validation fails (or produces warnings in strict mode)
    pub fn load(&self, path: &Path) -> Result<LoadResult, CaseError> {
        let metadata = std::fs::metadata(path).map_err(|_| CaseError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let max = self.options.limits.max_case_size;
        let file_size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if file_size > max {
            return Err(CaseError::InvalidValue {
                field: "file_size".to_string(),
                value: format!("{file_size} bytes"),
                expected: format!("at most {max} bytes"),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| CaseError::MissingFile {
            path: path.to_path_buf(),
        })?;

        debug!(path = %path.display(), bytes = file_size, "loading case file");
        self.load_source(&raw, path)
    }

    /// Loads a case from an in-memory string.
    ///
    /// Used for built-in cases and tests.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load), minus file access.
    pub fn load_from_str(&self, text: &str) -> Result<LoadResult, CaseError> {
        let max = self.options.limits.max_case_size;
        if text.len() > max {
            return Err(CaseError::InvalidValue {
                field: "case_size".to_string(),
                value: format!("{} bytes", text.len()),
                expected: format!("at most {max} bytes"),
            });
        }
        self.load_source(text, Path::new(INLINE_SOURCE))
    }

    fn load_source(&self, raw: &str, path: &Path) -> Result<LoadResult, CaseError> {
        let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        if text.trim().is_empty() {
            return Err(CaseError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Case file is empty".to_string(),
            });
        }

        let definition: CaseDefinition =
            serde_yaml::from_str(text).map_err(|e| CaseError::ParseError {
                path: path.to_path_buf(),
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        let mut result = Validator::new().validate(&definition);
        if self.options.strict {
            result.errors.append(&mut result.warnings);
        }
        if result.has_errors() {
            return Err(CaseError::ValidationError {
                path: path.display().to_string(),
                errors: result.errors,
            });
        }

        let warnings: Vec<LoadWarning> = result.warnings.into_iter().map(Into::into).collect();
        for warning in &warnings {
            warn!(case_id = %definition.id, "{warning}");
        }

        Ok(LoadResult {
            case: Arc::new(Case::new(definition)),
            warnings,
        })
    }
}

/// Path of the case file for `id` inside `root`, trying each extension.
pub(crate) fn case_file_in(root: &Path, id: &str) -> Option<PathBuf> {
    ["yaml", "yml", "json"]
        .iter()
        .map(|ext| root.join(format!("{id}.{ext}")))
        .find(|p| p.is_file())
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
id: minimal
title: Minimal
openingFeed: []
briefing: Go.
leads:
  - { id: a, title: A, resultText: a, tags: [x] }
interventions:
  - { id: act, title: Act, endings: { neutral: Done. } }
phaseTriggers:
  - { atPull: 1, fromPhase: 1, toPhase: 3 }
"#;

    #[test]
    fn test_load_from_str_resolves_rules() {
        let result = CaseLoader::with_defaults().load_from_str(MINIMAL).unwrap();
        assert_eq!(result.case.id(), "minimal");
        assert_eq!(result.case.rules.pulls_max, 6);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[test]
    fn test_json_is_accepted() {
        let json = r#"{"id":"j","title":"J","openingFeed":[],"briefing":"b",
            "leads":[],"interventions":[{"id":"x","title":"X","endings":{"neutral":"n"}}]}"#;
        let result = CaseLoader::with_defaults().load_from_str(json).unwrap();
        assert_eq!(result.case.title(), "J");
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_bom_is_stripped() {
        let text = format!("\u{feff}{MINIMAL}");
        assert!(CaseLoader::with_defaults().load_from_str(&text).is_ok());
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let err = CaseLoader::with_defaults().load_from_str("  \n").unwrap_err();
        assert!(matches!(err, CaseError::ParseError { .. }));
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = CaseLoader::with_defaults()
            .load_from_str("id: x\ntitle: [unclosed\n")
            .unwrap_err();
        match err {
            CaseError::ParseError { line, .. } => assert!(line.is_some()),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_leads_is_fatal() {
        let err = CaseLoader::with_defaults()
            .load_from_str("id: x\ntitle: X\nopeningFeed: []\nbriefing: b\ninterventions: []\n")
            .unwrap_err();
        assert!(err.to_string().contains("leads"), "{err}");
    }

    #[test]
    fn test_strict_promotes_warnings() {
        let text = MINIMAL.replace("title: Minimal", "title: ''");
        let loader = CaseLoader::new(LoaderOptions {
            strict: true,
            ..LoaderOptions::default()
        });
        let err = loader.load_from_str(&text).unwrap_err();
        assert!(matches!(err, CaseError::ValidationError { .. }));

        let relaxed = CaseLoader::with_defaults().load_from_str(&text).unwrap();
        assert_eq!(relaxed.warnings.len(), 1);
        assert_eq!(relaxed.warnings[0].location.as_deref(), Some("title"));
    }

    #[test]
    fn test_size_limit_is_enforced() {
        let loader = CaseLoader::new(LoaderOptions {
            strict: false,
            limits: CaseLimits { max_case_size: 16 },
        });
        let err = loader.load_from_str(MINIMAL).unwrap_err();
        assert!(matches!(err, CaseError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let result = CaseLoader::with_defaults().load(file.path()).unwrap();
        assert_eq!(result.case.id(), "minimal");
    }

    #[test]
    fn test_missing_file() {
        let err = CaseLoader::with_defaults()
            .load(Path::new("/nonexistent/case.yaml"))
            .unwrap_err();
        assert!(matches!(err, CaseError::MissingFile { .. }));
    }
}
