//! Data pipeline for session statistics.
//!
//! Classifies and parses log lines, accumulates sessions per user, derives
//! per-user and global statistics and writes the JSON report.

pub mod aggregator;
pub mod pipeline;
pub mod reader;
pub mod report;

pub use pipeline::{build_report_from_reader, run_pipeline, PipelineOptions, RunSummary};
pub use stats_core as core;
