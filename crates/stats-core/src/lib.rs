//! Shared building blocks for the session statistics tool.
//!
//! Holds the domain models, the error type, report formatting helpers and
//! the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{Result, StatsError};
