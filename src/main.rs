mod config;
mod document;
mod extract;
mod fetcher;
mod output;
mod pipeline;
mod slugs;

use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use config::{Cli, Mode, Settings, LETTERS};
use fetcher::HttpSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries data only; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;

    match settings.mode {
        Mode::PrintSlugs => {
            let source = Arc::new(HttpSource::new()?);
            info!("Listing slugs for {} letters", LETTERS.len());
            let rx = slugs::enumerate(source, settings.site, LETTERS, settings.on_letter_failure);
            let mut out = stdout();
            output::write_slugs(rx, &mut out).await?;
        }
        Mode::ReadSlugs => {
            let source = Arc::new(HttpSource::new()?);
            info!("Fetching slugs from stdin with {} workers", settings.workers);
            let input = pipeline::read_slugs(BufReader::new(tokio::io::stdin()));
            let rx = pipeline::fetch_records(source, settings.site, input, settings.workers);
            let mut out = stdout();
            output::write_records(rx, &mut out).await?;
        }
        Mode::Idle => {
            info!("Nothing to do: pass --print-slugs or --read-slugs");
            return Ok(());
        }
    }

    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}

fn stdout() -> impl Write {
    BufWriter::new(std::io::stdout().lock())
}
