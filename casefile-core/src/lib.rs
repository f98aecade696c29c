//! `Casefile` Core - case schema, rules and shared error types
//!
//! This crate provides the case definition types and error types shared
//! across `casefile` (engine and CLI) and the fuzz targets.

pub mod case;
pub mod error;
