use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Appends one timestamped caption line to the append-only caption log
///
/// The file is created if absent and never rewritten; existing entries are
/// untouched. A write failure is fatal for the run and propagates.
pub fn append_caption(log_path: &Path, caption: &str, timestamp: DateTime<Local>) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open caption log: {}", log_path.display()))?;

    writeln!(file, "{}: {}", timestamp.format("%Y-%m-%d %H:%M:%S"), caption)
        .with_context(|| format!("Failed to append to caption log: {}", log_path.display()))?;

    info!("Caption written to {}", log_path.display());
    Ok(())
}
