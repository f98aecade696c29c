//! Built-in cases
//!
//! Case files embedded in the binary at compile time, so `casefile play`
//! works without a library directory.

use std::sync::Arc;

use casefile_core::case::Case;

use crate::error::LibraryError;

use super::library::{CaseLibrary, CaseSummary, suggest_id};
use super::loader::{CaseLoader, LoaderOptions};

/// A case embedded in the binary.
pub struct BuiltinCase {
    /// Case id, matching the `id` inside the YAML.
    pub id: &'static str,

    /// Case title, matching the `title` inside the YAML.
    pub title: &'static str,

    /// Raw YAML content (embedded at compile time).
    pub yaml: &'static str,
}

static BUILTIN_CASES: &[BuiltinCase] = &[
    BuiltinCase {
        id: "night-shift",
        title: "Night Shift",
        yaml: include_str!("../../cases/night-shift.yaml"),
    },
    BuiltinCase {
        id: "cold-storage",
        title: "Cold Storage",
        yaml: include_str!("../../cases/cold-storage.yaml"),
    },
];

/// Look up a built-in case by exact id.
#[must_use]
pub fn find_case(id: &str) -> Option<&'static BuiltinCase> {
    BUILTIN_CASES.iter().find(|c| c.id == id)
}

/// All built-in cases in registry order.
#[must_use]
pub fn list_cases() -> &'static [BuiltinCase] {
    BUILTIN_CASES
}

/// Library backed by the built-in cases.
#[derive(Debug, Default)]
pub struct BuiltinLibrary {
    loader: CaseLoader,
}

impl BuiltinLibrary {
    /// Creates the built-in library with the given loader options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self {
            loader: CaseLoader::new(options),
        }
    }
}

impl CaseLibrary for BuiltinLibrary {
    fn fetch_case_index(&self) -> Result<Vec<CaseSummary>, LibraryError> {
        Ok(BUILTIN_CASES
            .iter()
            .map(|c| CaseSummary {
                id: c.id.to_string(),
                title: c.title.to_string(),
            })
            .collect())
    }

    fn fetch_case(&self, id: &str) -> Result<Arc<Case>, LibraryError> {
        let builtin = find_case(id).ok_or_else(|| LibraryError::UnknownCase {
            id: id.to_string(),
            suggestion: suggest_id(id, BUILTIN_CASES.iter().map(|c| c.id)),
        })?;
        Ok(self.loader.load_from_str(builtin.yaml)?.case)
    }
}
