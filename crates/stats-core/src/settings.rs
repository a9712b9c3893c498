use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::models::ClassificationMode;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Aggregate per-user browsing statistics from a session log into a JSON report
#[derive(Parser, Debug, Clone)]
#[command(
    name = "session-stats",
    about = "Aggregate per-user browsing statistics from a session log into a JSON report",
    version
)]
pub struct Settings {
    /// Input log file
    #[arg(long, short, default_value = "data.txt", env = "SESSION_STATS_INPUT")]
    pub input: PathBuf,

    /// Output report file (replaced on every run)
    #[arg(long, short, default_value = "result.json", env = "SESSION_STATS_OUTPUT")]
    pub output: PathBuf,

    /// Accepted for compatibility with benchmark scripts; has no effect
    #[arg(long)]
    pub disable_gc: bool,

    /// Treat any line containing "user" as a user declaration
    #[arg(long)]
    pub legacy_classification: bool,

    /// Indent the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve derived values.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] but from an explicit argument list, so tests
    /// do not depend on the process command line.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// Classification rule selected by `--legacy-classification`.
    pub fn classification_mode(&self) -> ClassificationMode {
        if self.legacy_classification {
            ClassificationMode::Substring
        } else {
            ClassificationMode::Strict
        }
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
