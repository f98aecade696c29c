//! Command-line interface
//!
//! Argument parsing, the typed command language of `play`, text rendering
//! and the per-command handlers.

pub mod args;
pub mod commands;
pub mod input;
pub mod render;
