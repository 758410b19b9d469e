//! Retrying content fetcher for QuizForge.
//!
//! Wraps a single-attempt [`PageSource`] with URL validation, a
//! process-lifetime [`FetchCache`], and a bounded retry loop with a fixed
//! delay. An attempt that yields empty content counts as a success (logged as
//! a warning, cached, returned as-is) — callers decide what emptiness means.

mod cache;
mod extract;
mod source;

use std::time::Duration;

use tracing::{info, instrument, warn};
use url::Url;

use quizforge_shared::{FetchConfig, QuizForgeError, Result};

pub use cache::FetchCache;
pub use extract::extract_text;
pub use source::{HttpPageSource, PageSource};

/// Retrying fetcher: validation → cache → bounded attempts → cache write.
pub struct Fetcher<S: PageSource> {
    source: S,
    cache: FetchCache,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Fetcher<HttpPageSource> {
    /// Build an HTTP-backed fetcher from config.
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Ok(Self::new(HttpPageSource::new()?, config))
    }
}

impl<S: PageSource> Fetcher<S> {
    /// Build a fetcher over `source` with the given retry policy.
    pub fn new(source: S, config: &FetchConfig) -> Self {
        Self {
            source,
            cache: FetchCache::new(),
            // A zero-attempt fetcher can never succeed
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay(),
        }
    }

    /// Fetch the text content of `url`, retrying transient failures.
    ///
    /// Fails immediately with `InvalidInput` for a non-absolute or
    /// non-http(s) URL — no attempt is made. After `max_attempts` failed
    /// attempts, fails with `FetchExhausted` wrapping the last error.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let target = parse_target(url)?;

        if let Some(cached) = self.cache.get(url) {
            info!(len = cached.len(), "returning cached content");
            return Ok(cached);
        }

        let mut last_error: Option<QuizForgeError> = None;

        for attempt in 1..=self.max_attempts {
            match self.source.fetch_page(&target).await {
                Ok(content) => {
                    let content = content.trim().to_string();
                    if content.is_empty() {
                        warn!(attempt, "fetch succeeded but no content extracted");
                    } else {
                        info!(attempt, len = content.len(), "content extracted");
                    }
                    self.cache.insert(url, content.clone());
                    return Ok(content);
                }
                Err(e) => {
                    warn!(attempt, max_attempts = self.max_attempts, error = %e, "fetch attempt failed");
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        Err(QuizForgeError::FetchExhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".into()),
        })
    }
}

/// Validate that `url` is a syntactically valid absolute http(s) URL.
fn parse_target(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| QuizForgeError::invalid_input(format!("invalid URL '{url}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(QuizForgeError::invalid_input(format!(
            "unsupported URL scheme '{other}' in '{url}'"
        ))),
    }
}
