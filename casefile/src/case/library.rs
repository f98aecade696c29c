//! Case libraries
//!
//! A library answers two questions: which cases exist, and what is in one
//! of them. Cases handed out by a library have already been loaded and
//! validated.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use casefile_core::case::Case;

use crate::error::LibraryError;

use super::loader::{CaseLoader, LoaderOptions, case_file_in};
use super::validation::is_valid_id;

/// One entry of a case index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseSummary {
    /// Case id
    pub id: String,
    /// Case title
    pub title: String,
}

/// Source of case definitions.
pub trait CaseLibrary: Send + Sync {
    /// Lists every case in the library.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    fn fetch_case_index(&self) -> Result<Vec<CaseSummary>, LibraryError>;

    /// Loads the case `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or the case fails to load.
    fn fetch_case(&self, id: &str) -> Result<Arc<Case>, LibraryError>;
}

/// Shape of an authored `index.yaml` / `index.json`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IndexFile {
    List(Vec<CaseSummary>),
    Wrapped { cases: Vec<CaseSummary> },
}

impl IndexFile {
    fn into_cases(self) -> Vec<CaseSummary> {
        match self {
            Self::List(cases) | Self::Wrapped { cases } => cases,
        }
    }
}

/// A directory of case files named `<id>.yaml`, `<id>.yml` or `<id>.json`.
#[derive(Debug)]
pub struct DirectoryLibrary {
    root: PathBuf,
    loader: CaseLoader,
}

impl DirectoryLibrary {
    /// Creates a library rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, options: LoaderOptions) -> Self {
        Self {
            root: root.into(),
            loader: CaseLoader::new(options),
        }
    }

    /// Library root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn index_file(&self) -> Option<PathBuf> {
        ["index.yaml", "index.yml", "index.json"]
            .iter()
            .map(|name| self.root.join(name))
            .find(|p| p.is_file())
    }

    fn read_index(path: &Path) -> Result<Vec<CaseSummary>, LibraryError> {
        let index_error = |message: String| LibraryError::Index {
            path: path.display().to_string(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| index_error(e.to_string()))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        let index: IndexFile = serde_yaml::from_str(text).map_err(|e| index_error(e.to_string()))?;
        Ok(index.into_cases())
    }

    fn scan(&self) -> Result<Vec<CaseSummary>, LibraryError> {
        let mut cases = Vec::new();
        for ext in ["yaml", "yml", "json"] {
            let pattern = self.root.join(format!("*.{ext}"));
            let pattern = pattern.to_string_lossy();
            let entries = glob::glob(&pattern).map_err(|e| LibraryError::Index {
                path: pattern.to_string(),
                message: e.to_string(),
            })?;

            for path in entries.filter_map(Result::ok) {
                if path.file_stem().is_some_and(|stem| stem == "index") {
                    continue;
                }
                match self.loader.load(&path) {
                    Ok(loaded) => cases.push(CaseSummary {
                        id: loaded.case.id().to_string(),
                        title: loaded.case.title().to_string(),
                    }),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping unloadable case"),
                }
            }
        }
        cases.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(cases)
    }
}

impl CaseLibrary for DirectoryLibrary {
    fn fetch_case_index(&self) -> Result<Vec<CaseSummary>, LibraryError> {
        match self.index_file() {
            Some(path) => Self::read_index(&path),
            None => self.scan(),
        }
    }

    fn fetch_case(&self, id: &str) -> Result<Arc<Case>, LibraryError> {
        if !is_valid_id(id) {
            return Err(LibraryError::InvalidId { id: id.to_string() });
        }

        let Some(path) = case_file_in(&self.root, id) else {
            let known = self.fetch_case_index().unwrap_or_default();
            return Err(LibraryError::UnknownCase {
                id: id.to_string(),
                suggestion: suggest_id(id, known.iter().map(|c| c.id.as_str())),
            });
        };

        let loaded = self.loader.load(&path)?;
        if loaded.case.id() != id {
            warn!(
                requested = id,
                declared = loaded.case.id(),
                "case file declares a different id than its file name"
            );
        }
        debug!(case_id = id, path = %path.display(), "case fetched");
        Ok(loaded.case)
    }
}

/// Suggests a similar case id for typo correction.
///
/// Returns the closest match if its Damerau-Levenshtein distance is at most 3.
#[must_use]
pub fn suggest_id<'a>(input: &str, known: impl Iterator<Item = &'a str>) -> Option<String> {
    known
        .map(|id| (id, strsim::damerau_levenshtein(input, id)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(id, _)| id.to_string())
}
