use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, warn};

use crate::config::Site;
use crate::extract::{self, Entry};
use crate::fetcher::{DocumentSource, FetchError};

/// Result of processing one slug: its entry, or the fetch failure in its place.
#[derive(Debug)]
pub struct Record {
    pub slug: String,
    pub outcome: Result<Entry, FetchError>,
}

impl Record {
    /// No error and all three sections blank.
    pub fn is_empty(&self) -> bool {
        matches!(&self.outcome, Ok(entry) if entry.is_empty())
    }
}

/// Fetch and extract every slug from `slugs` with at most `workers` jobs in flight.
///
/// Records arrive in completion order. A job holds its permit until its record
/// has been handed to the channel, so a stalled consumer stalls dispatch once
/// every worker is blocked. The receiver closes after the input is exhausted and
/// the last job has reported.
pub fn fetch_records<S, I>(
    source: Arc<S>,
    site: Site,
    slugs: I,
    workers: usize,
) -> mpsc::Receiver<Record>
where
    S: DocumentSource,
    I: Stream<Item = String> + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Record>(1);
    let semaphore = Arc::new(Semaphore::new(workers.max(1)));
    let site = Arc::new(site);

    tokio::spawn(async move {
        let mut slugs = std::pin::pin!(slugs);
        while let Some(slug) = slugs.next().await {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let source = Arc::clone(&source);
            let site = Arc::clone(&site);
            let tx = tx.clone();

            tokio::spawn(async move {
                let record = fetch_one(source.as_ref(), &site, slug).await;
                let _ = tx.send(record).await;
                drop(permit);
            });
        }
        debug!("Slug input exhausted, waiting for in-flight jobs");
        // Our tx drops here; rx closes once every job has dropped its clone.
    });

    rx
}

async fn fetch_one<S: DocumentSource>(source: &S, site: &Site, slug: String) -> Record {
    let url = site.detail_url(&slug);
    let outcome = match source.fetch(&url).await {
        Ok(body) => Ok(extract::parse_entry(&body)),
        Err(e) => {
            warn!("Fetch failed for {}: {}", slug, e);
            Err(e)
        }
    };
    Record { slug, outcome }
}

/// Lazily read slugs, one per line. A trailing `\r` is removed and blank lines
/// are skipped. Bytes that are not UTF-8 are replaced, never dropped; only an
/// I/O error ends the stream.
pub fn read_slugs<R>(reader: R) -> impl Stream<Item = String> + Send + 'static
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    futures::stream::unfold(reader.split(b'\n'), |mut lines| async move {
        loop {
            match lines.next_segment().await {
                Ok(Some(bytes)) => {
                    let line = String::from_utf8_lossy(&bytes);
                    let slug = line.trim_end_matches('\r');
                    if slug.trim().is_empty() {
                        continue;
                    }
                    return Some((slug.to_string(), lines));
                }
                Ok(None) => return None,
                Err(e) => {
                    warn!("Stopped reading slugs: {}", e);
                    return None;
                }
            }
        }
    })
}

// ── Tests ──
