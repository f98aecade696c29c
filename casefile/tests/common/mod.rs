//! Shared integration-test harness: fixture loading, pre-entered runs and
//! spawning the `casefile` binary.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::Arc;

use casefile::case::{CaseLoader, DirectoryLibrary, LoaderOptions};
use casefile::engine::GameState;
use casefile_core::case::Case;

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Loads a fixture case through the real loader.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn load_fixture(name: &str) -> Arc<Case> {
    CaseLoader::with_defaults()
        .load(&fixture_path(name))
        .unwrap_or_else(|e| panic!("fixture {name} failed to load: {e}"))
        .case
}

/// A run of `name` that has been opened, entered and fully flushed.
#[must_use]
pub fn entered(name: &str) -> GameState {
    let mut state = GameState::new();
    state.start_case(load_fixture(name));
    state.enter_case();
    state.flush_all(usize::MAX);
    state
}

/// Pulls each lead in order.
pub fn pull_all(state: &mut GameState, leads: &[&str]) {
    for lead in leads {
        state.apply_lead(lead);
    }
}

/// Directory library over `tests/fixtures/library`.
#[must_use]
pub fn fixture_library() -> DirectoryLibrary {
    DirectoryLibrary::new(fixture_path("library"), LoaderOptions::default())
}

/// Runs the binary with `args` and no stdin.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_casefile"))
        .args(args)
        .env_remove("CASEFILE_LIBRARY")
        .env_remove("CASEFILE_SAVE_DIR")
        .env_remove("CASEFILE_PACE_MS")
        .stdin(Stdio::null())
        .output()
        .expect("failed to run casefile")
}

/// Runs the binary with `args`, feeding `script` on stdin.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn run_with_input(args: &[&str], script: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_casefile"))
        .args(args)
        .env_remove("CASEFILE_LIBRARY")
        .env_remove("CASEFILE_SAVE_DIR")
        .env_remove("CASEFILE_PACE_MS")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn casefile");

    child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(script.as_bytes())
        .expect("failed to write script");

    child.wait_with_output().expect("failed to wait for casefile")
}
