//! Single-attempt page source.
//!
//! [`PageSource`] is the unit that can fail: one network fetch plus content
//! extraction, no retries. The retry loop lives in [`crate::Fetcher`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use quizforge_shared::{QuizForgeError, Result};

use crate::extract;

/// User-Agent string for fetch requests.
const USER_AGENT: &str = concat!("QuizForge/", env!("CARGO_PKG_VERSION"));

/// One content-fetch attempt for a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch and extract the text content of `url`. May return an empty
    /// string; emptiness is the caller's concern.
    async fn fetch_page(&self, url: &Url) -> Result<String>;
}

/// HTTP-backed page source: GET the page, extract Markdown text.
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    /// Build a page source with the standard client configuration.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| QuizForgeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Build a page source around an existing client (for tests).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| QuizForgeError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuizForgeError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| QuizForgeError::Network(format!("{url}: body read failed: {e}")))?;

        extract::extract_text(&body)
    }
}
