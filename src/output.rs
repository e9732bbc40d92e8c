use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::fetcher::FetchError;
use crate::pipeline::Record;

pub const HEADER: &str = "Refran\tSignificado\tUso";

/// Counts returned after a fetch-mode run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
    pub empty: usize,
}

/// Header, then one TSV row per non-empty record or one `ERROR:` line per failure.
pub async fn write_records<W: Write>(
    mut rx: mpsc::Receiver<Record>,
    out: &mut W,
) -> Result<WriteStats> {
    let mut stats = WriteStats::default();
    writeln!(out, "{}", HEADER).context("Failed to write header")?;

    while let Some(record) = rx.recv().await {
        stats.total += 1;
        match &record.outcome {
            Err(e) => {
                stats.errors += 1;
                writeln!(out, "ERROR: {}", e).context("Failed to write row")?;
            }
            Ok(_) if record.is_empty() => stats.empty += 1,
            Ok(entry) => {
                stats.ok += 1;
                writeln!(out, "{}\t{}\t{}", entry.idiom, entry.definition, entry.usage)
                    .context("Failed to write row")?;
            }
        }
    }

    out.flush().context("Failed to flush output")?;
    info!(
        "Fetched {} slugs ({} ok, {} errors, {} empty)",
        stats.total, stats.ok, stats.errors, stats.empty
    );
    Ok(stats)
}

/// One slug per line. Stops at the first failed letter and returns it as the error.
pub async fn write_slugs<W: Write>(
    mut rx: mpsc::Receiver<Result<String, FetchError>>,
    out: &mut W,
) -> Result<usize> {
    let mut count = 0usize;
    while let Some(item) = rx.recv().await {
        let slug = item.context("Failed to fetch listing page")?;
        writeln!(out, "{}", slug).context("Failed to write slug")?;
        count += 1;
    }

    out.flush().context("Failed to flush output")?;
    info!("Listed {} slugs", count);
    Ok(count)
}

// ── Tests ──
