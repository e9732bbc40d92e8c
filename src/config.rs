use clap::builder::TypedValueParser;
use clap::Parser;
use thiserror::Error;

/// Idioms only start with these letters (no K, W or X on the listing index).
pub const LETTERS: &str = "ABCDEFGHIJLMNOPQRSTUVYZ";
pub const BASE_URL: &str = "http://cvc.cervantes.es/lengua/refranero";
pub const NETWORK_CONNS: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "refranero", about = "Refranero scraper: list idiom slugs or fetch their entries")]
pub struct Cli {
    /// Crawl the listing page of every letter and print each slug on its own line
    #[arg(long)]
    pub print_slugs: bool,

    /// Read slugs from stdin, one per line, and print idiom, definition and usage as TSV
    #[arg(long)]
    pub read_slugs: bool,

    /// Number of concurrent detail-page fetches
    #[arg(short, long, default_value_t = NETWORK_CONNS, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub workers: usize,

    /// Base URL of the refranero site
    #[arg(long, default_value = BASE_URL)]
    pub base_url: String,

    /// Log and skip letters whose listing page fails instead of aborting
    #[arg(long)]
    pub skip_failed_letters: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--print-slugs and --read-slugs cannot both be passed")]
    ConflictingModes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    PrintSlugs,
    ReadSlugs,
    Idle,
}

/// What the enumerator does when one letter's listing page cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterFailure {
    Abort,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    base_url: String,
}

impl Site {
    pub fn new(base_url: &str) -> Self {
        Site {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn listing_url(&self, letter: char) -> String {
        format!("{}/listado.aspx?letra={}", self.base_url, letter)
    }

    pub fn detail_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url, slug)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub mode: Mode,
    pub workers: usize,
    pub site: Site,
    pub on_letter_failure: LetterFailure,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mode = match (cli.print_slugs, cli.read_slugs) {
            (true, true) => return Err(ConfigError::ConflictingModes),
            (true, false) => Mode::PrintSlugs,
            (false, true) => Mode::ReadSlugs,
            (false, false) => Mode::Idle,
        };
        let on_letter_failure = if cli.skip_failed_letters {
            LetterFailure::Skip
        } else {
            LetterFailure::Abort
        };

        Ok(Settings {
            mode,
            workers: cli.workers,
            site: Site::new(&cli.base_url),
            on_letter_failure,
        })
    }
}

// ── Tests ──
