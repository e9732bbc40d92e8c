use std::future::Future;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("refranero/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Anything that can turn a URL into an HTML body.
pub trait DocumentSource: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Plain unauthenticated GETs over one shared client. No timeout, no retry.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpSource { client })
    }
}

impl DocumentSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(request_error)
    }
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    enum Reply {
        Body(String),
        Fail(StatusCode),
    }

    /// In-memory source. Unknown URLs answer 404.
    #[derive(Default)]
    pub struct MockSource {
        replies: HashMap<String, Reply>,
        delays: HashMap<String, Duration>,
        default_delay: Duration,
        active: AtomicUsize,
        pub max_active: AtomicUsize,
        pub started: AtomicUsize,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
            self.replies.insert(url.into(), Reply::Body(body.into()));
            self
        }

        pub fn failing(mut self, url: impl Into<String>, status: StatusCode) -> Self {
            self.replies.insert(url.into(), Reply::Fail(status));
            self
        }

        pub fn delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
            self.delays.insert(url.into(), delay);
            self
        }

        pub fn default_delay(mut self, delay: Duration) -> Self {
            self.default_delay = delay;
            self
        }
    }

    impl DocumentSource for MockSource {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays.get(url).copied().unwrap_or(self.default_delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let result = match self.replies.get(url) {
                Some(Reply::Body(body)) => Ok(body.clone()),
                Some(Reply::Fail(status)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: StatusCode::NOT_FOUND,
                }),
            };
            self.active.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }
}

// ── Tests ──
