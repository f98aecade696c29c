//! `Casefile` - deterministic case-file investigation engine
//!
//! A player spends a fixed budget of pulls on leads, gathers evidence tags,
//! watches the phase advance and finally commits to one intervention whose
//! outcome follows from evidence, exposure and threat. The engine is a
//! single-owner state machine; the CLI is one rendering collaborator.

pub mod case;
pub mod cli;
pub mod engine;
pub mod error;
pub mod observability;
pub mod persistence;
pub mod session;
