use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::{LetterFailure, Site};
use crate::extract;
use crate::fetcher::{DocumentSource, FetchError};

/// Fetch the listing page of every letter concurrently and stream out the slugs.
///
/// With `LetterFailure::Abort` a failed letter is sent as an `Err`; the consumer
/// is expected to stop there. Dropping the receiver makes every remaining
/// letter task give up on its next send.
pub fn enumerate<S: DocumentSource>(
    source: Arc<S>,
    site: Site,
    letters: &str,
    on_failure: LetterFailure,
) -> mpsc::Receiver<Result<String, FetchError>> {
    let (tx, rx) = mpsc::channel(1);
    let site = Arc::new(site);

    for letter in letters.chars() {
        let source = Arc::clone(&source);
        let site = Arc::clone(&site);
        let tx = tx.clone();

        tokio::spawn(async move {
            let url = site.listing_url(letter);
            let body = match source.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    match on_failure {
                        LetterFailure::Abort => {
                            let _ = tx.send(Err(e)).await;
                        }
                        LetterFailure::Skip => warn!("Skipping letter {}: {}", letter, e),
                    }
                    return;
                }
            };

            let slugs = extract::parse_listing(&body);
            debug!("Letter {}: {} slugs", letter, slugs.len());
            for slug in slugs {
                if tx.send(Ok(slug)).await.is_err() {
                    return;
                }
            }
        });
    }

    rx
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::*;
    use crate::fetcher::mock::MockSource;

    const BASE: &str = "http://refranero.test";

    fn listing(letter: char, n: usize) -> String {
        let items: String = (0..n)
            .map(|i| format!(r#"<li><a href="ficha.aspx?{}{}">x</a></li>"#, letter, i))
            .collect();
        format!(r#"<ol id="lista_az">{}</ol>"#, items)
    }

    fn source(letters: &str, per_letter: usize) -> MockSource {
        let site = Site::new(BASE);
        letters.chars().fold(MockSource::new(), |src, c| {
            src.page(site.listing_url(c), listing(c, per_letter))
        })
    }

    async fn drain(
        mut rx: mpsc::Receiver<Result<String, FetchError>>,
    ) -> (Vec<String>, Option<FetchError>) {
        let mut slugs = Vec::new();
        while let Some(item) = rx.recv().await {
            match item {
                Ok(slug) => slugs.push(slug),
                Err(e) => return (slugs, Some(e)),
            }
        }
        (slugs, None)
    }

    #[tokio::test]
    async fn all_letters_merged() {
        let letters = "ABC";
        let rx = enumerate(
            Arc::new(source(letters, 4)),
            Site::new(BASE),
            letters,
            LetterFailure::Abort,
        );
        let (slugs, err) = drain(rx).await;
        assert!(err.is_none());
        assert_eq!(slugs.len(), 12);
        let unique: HashSet<_> = slugs.iter().collect();
        assert_eq!(unique.len(), 12);
        assert!(slugs.contains(&"ficha.aspx?B3".to_string()));
    }

    #[tokio::test]
    async fn failed_letter_aborts() {
        let site = Site::new(BASE);
        // B fails right away while A and C answer later.
        let src = source("AC", 3)
            .failing(site.listing_url('B'), StatusCode::SERVICE_UNAVAILABLE)
            .delay(site.listing_url('A'), Duration::from_millis(50))
            .delay(site.listing_url('C'), Duration::from_millis(50));

        let rx = enumerate(Arc::new(src), site, "ABC", LetterFailure::Abort);
        let (slugs, err) = drain(rx).await;
        assert!(slugs.is_empty());
        assert!(matches!(
            err,
            Some(FetchError::Status { status: StatusCode::SERVICE_UNAVAILABLE, .. })
        ));
    }

    #[tokio::test]
    async fn failed_letter_skipped() {
        let site = Site::new(BASE);
        let src = source("AC", 3).failing(site.listing_url('B'), StatusCode::NOT_FOUND);

        let rx = enumerate(Arc::new(src), site, "ABC", LetterFailure::Skip);
        let (slugs, err) = drain(rx).await;
        assert!(err.is_none());
        assert_eq!(slugs.len(), 6);
        assert!(slugs.iter().all(|s| !s.contains('B')));
    }
}
