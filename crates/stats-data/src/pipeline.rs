//! The single entry point that turns a session log into a JSON report.
//!
//! A run removes any previous report, streams the input once, builds the
//! report and writes it through a temporary file that is renamed into place.
//! A failed run leaves no report behind.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use stats_core::error::{Result, StatsError};
use stats_core::models::ClassificationMode;
use stats_core::settings::Settings;
use tracing::{debug, info, warn};

use crate::aggregator::{IngestStats, SessionAggregator};
use crate::reader::{open_log, LogReader};
use crate::report::{Report, ReportBuilder};

// ── Public types ──────────────────────────────────────────────────────────────

/// Knobs for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub classification: ClassificationMode,
    /// Accepted for compatibility with benchmark harnesses. No effect.
    pub disable_gc: bool,
    /// Indent the JSON output.
    pub pretty: bool,
}

impl From<&Settings> for PipelineOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            classification: settings.classification_mode(),
            disable_gc: settings.disable_gc,
            pretty: settings.pretty,
        }
    }
}

/// What a completed run observed. Intended for logging and for external
/// timing harnesses; none of it ends up in the report.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub output: PathBuf,
    #[serde(flatten)]
    pub ingest: IngestStats,
    pub total_users: usize,
    pub total_sessions: usize,
    /// Wall-clock seconds spent reading and aggregating the input.
    pub parse_time_seconds: f64,
    /// Wall-clock seconds spent building and writing the report.
    pub report_time_seconds: f64,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Feed every line of `reader` into a fresh [`SessionAggregator`].
///
/// Stops at the first orphan session or read error.
pub fn aggregate_lines<R: BufRead>(
    reader: R,
    mode: ClassificationMode,
) -> Result<SessionAggregator> {
    let mut aggregator = SessionAggregator::new();
    for line in LogReader::new(reader, mode) {
        aggregator.ingest(line?)?;
    }

    let stats = aggregator.stats();
    if stats.malformed_lines > 0 {
        warn!(
            "{} line(s) had missing fields and were read with empty values",
            stats.malformed_lines
        );
    }
    Ok(aggregator)
}

/// Run the parse/aggregate/report stages on an in-memory reader.
pub fn build_report_from_reader<R: BufRead>(
    reader: R,
    options: &PipelineOptions,
) -> Result<(Report, IngestStats)> {
    let aggregator = aggregate_lines(reader, options.classification)?;
    let report = ReportBuilder::new().build(&aggregator);
    Ok((report, aggregator.stats().clone()))
}

/// Run the whole pipeline from `input` to `output`.
///
/// 1. Remove any existing report at `output`.
/// 2. Stream and aggregate `input`.
/// 3. Build the report.
/// 4. Write it atomically to `output`.
pub fn run_pipeline(
    input: &Path,
    output: &Path,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    let started_at = Utc::now();
    if options.disable_gc {
        debug!("--disable-gc requested; Rust has no collector to disable");
    }
    info!(
        "Building report from {} into {}",
        input.display(),
        output.display()
    );

    remove_stale_output(output)?;

    // ── Step 1: Parse & aggregate ─────────────────────────────────────────────
    let parse_start = Instant::now();
    let reader = open_log(input)?;
    let aggregator = aggregate_lines(reader, options.classification).map_err(|e| match e {
        StatsError::Io(source) => StatsError::FileRead {
            path: input.to_path_buf(),
            source,
        },
        other => other,
    })?;
    let parse_time = parse_start.elapsed().as_secs_f64();

    // ── Step 2: Report ────────────────────────────────────────────────────────
    let report_start = Instant::now();
    let report = ReportBuilder::new().build(&aggregator);
    write_report(&report, output, options.pretty)?;
    let report_time = report_start.elapsed().as_secs_f64();

    let summary = RunSummary {
        started_at,
        output: output.to_path_buf(),
        ingest: aggregator.stats().clone(),
        total_users: report.total_users,
        total_sessions: report.total_sessions,
        parse_time_seconds: parse_time,
        report_time_seconds: report_time,
    };

    debug!(
        "Run finished: {} lines, {} users, {} sessions",
        summary.ingest.lines_read, summary.total_users, summary.total_sessions
    );

    Ok(summary)
}

/// Serialise `report` to `path` via a sibling temp file and a rename.
pub fn write_report(report: &Report, path: &Path, pretty: bool) -> Result<()> {
    let tmp = temp_path(path);
    let write_err = |source: std::io::Error| StatsError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let result = (|| -> Result<()> {
        let file = File::create(&tmp).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        write_json(&mut writer, report, pretty).map_err(|e| json_error(e, path))?;
        writer.flush().map_err(write_err)?;
        Ok(())
    })();

    if let Err(e) = result {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    std::fs::rename(&tmp, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp);
        write_err(source)
    })
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn write_json<W: Write>(
    writer: W,
    report: &Report,
    pretty: bool,
) -> std::result::Result<(), serde_json::Error> {
    if pretty {
        serde_json::to_writer_pretty(writer, report)
    } else {
        serde_json::to_writer(writer, report)
    }
}

/// I/O failures surfacing through serde_json are write errors on `path`.
fn json_error(e: serde_json::Error, path: &Path) -> StatsError {
    if e.io_error_kind().is_some() {
        StatsError::FileWrite {
            path: path.to_path_buf(),
            source: e.into(),
        }
    } else {
        StatsError::JsonSerialize(e)
    }
}

/// Delete a report left by a previous run so that a failure now cannot be
/// mistaken for success.
fn remove_stale_output(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(StatsError::Config(format!(
            "output path {} is a directory",
            path.display()
        )));
    }
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed previous report at {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(StatsError::FileWrite {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `result.json` → `result.json.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
