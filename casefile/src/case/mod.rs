//! Case loading, validation and libraries

pub mod builtin;
pub mod library;
pub mod loader;
pub mod validation;

pub use builtin::BuiltinLibrary;
pub use library::{CaseLibrary, CaseSummary, DirectoryLibrary};
pub use loader::{CaseLimits, CaseLoader, LoadResult, LoadWarning, LoaderOptions};
pub use validation::{ValidationResult, Validator};
