mod bootstrap;

use anyhow::{Context, Result};
use stats_core::settings::Settings;
use stats_data::pipeline::{run_pipeline, PipelineOptions};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("session-stats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Settings: {:?}", settings);

    let options = PipelineOptions::from(&settings);
    let summary = run_pipeline(&settings.input, &settings.output, &options).with_context(|| {
        format!(
            "failed to build report from {}",
            settings.input.display()
        )
    })?;

    tracing::info!(
        "Wrote {} ({} users, {} sessions) in {:.3}s parse + {:.3}s report",
        summary.output.display(),
        summary.total_users,
        summary.total_sessions,
        summary.parse_time_seconds,
        summary.report_time_seconds,
    );
    if summary.ingest.malformed_lines > 0 || summary.ingest.blank_lines > 0 {
        tracing::info!(
            "{} malformed line(s), {} blank line(s) skipped",
            summary.ingest.malformed_lines,
            summary.ingest.blank_lines
        );
    }

    Ok(())
}
