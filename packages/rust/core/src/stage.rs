//! Stage invocation contract and collaborator seams.
//!
//! Every stage run produces a [`StageResponse`]: `200` for success including
//! "nothing to do", `400` for a malformed input record, `500` for any other
//! failure. Errors never escape a stage boundary; they are logged and folded
//! into the response.

use async_trait::async_trait;

use quizforge_fetcher::{Fetcher, PageSource};
use quizforge_quizgen::GeminiClient;
use quizforge_shared::{QuizForgeError, Result};

// ---------------------------------------------------------------------------
// StageResponse
// ---------------------------------------------------------------------------

/// Structured result handed back to whatever triggered the stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResponse {
    /// 200 success (including no-op), 400 malformed record, 500 failure.
    pub status_code: u16,
    /// Human-readable message.
    pub body: String,
}

impl StageResponse {
    /// Success, including "no pending work".
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    /// A selected record is malformed and cannot be processed.
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            body: body.into(),
        }
    }

    /// Any other failure, carrying the underlying cause string.
    pub fn failure(err: &QuizForgeError) -> Self {
        Self {
            status_code: 500,
            body: err.to_string(),
        }
    }

    /// Whether the stage completed without failure.
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

// ---------------------------------------------------------------------------
// Collaborator seams
// ---------------------------------------------------------------------------

/// Content retrieval for a URL. The crawl stage depends on this seam, not on
/// the HTTP fetcher directly.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch extracted text for `url` (may be empty).
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<S: PageSource> ContentFetcher for Fetcher<S> {
    async fn fetch(&self, url: &str) -> Result<String> {
        Fetcher::fetch(self, url).await
    }
}

/// Quiz text generation from crawled content.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate quiz text; empty output is the implementation's failure.
    async fn generate(&self, content: &str) -> Result<String>;
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, content: &str) -> Result<String> {
        GeminiClient::generate(self, content).await
    }
}
