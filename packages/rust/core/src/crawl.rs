//! Crawl stage: select → fetch → persist → commit → notify.
//!
//! One invocation processes at most one record. The ledger is loaded fresh,
//! mutated in memory, and saved only as the final step, so any failure before
//! commit leaves the stored ledger exactly as it was and the stage is safe to
//! re-invoke (selection re-evaluates current state).

use tracing::{error, info, instrument, warn};

use quizforge_shared::{QuizForgeError, Result};
use quizforge_storage::{BlobStore, LedgerStore, NS_INTERMEDIATE};

use crate::stage::{ContentFetcher, StageResponse};
use crate::trigger::{StageTrigger, TriggerPayload};

/// Outcome of one crawl-stage execution, before response mapping.
enum CrawlOutcome {
    /// No record satisfies the crawl predicate.
    NothingToDo,
    /// The selected record has no usable URL.
    MalformedRecord,
    /// A record was fetched, persisted, and committed.
    Committed { url: String, stored_key: String },
}

/// The crawl stage runner.
pub struct CrawlStage<'a, F: ContentFetcher> {
    fetcher: &'a F,
    blobs: &'a BlobStore,
    ledger: &'a LedgerStore,
    trigger: Option<&'a dyn StageTrigger>,
}

impl<'a, F: ContentFetcher> CrawlStage<'a, F> {
    /// A crawl stage without a downstream trigger (local mode).
    pub fn new(fetcher: &'a F, blobs: &'a BlobStore, ledger: &'a LedgerStore) -> Self {
        Self {
            fetcher,
            blobs,
            ledger,
            trigger: None,
        }
    }

    /// Notify `trigger` after each successful commit.
    pub fn with_trigger(mut self, trigger: &'a dyn StageTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Run the stage once. Never returns an error; failures are folded into
    /// the response.
    #[instrument(skip_all)]
    pub async fn run(&self) -> StageResponse {
        info!("crawl stage triggered");

        match self.execute().await {
            Ok(CrawlOutcome::NothingToDo) => {
                info!("no pending URL found in ledger");
                StageResponse::ok("no pending URL to process")
            }
            Ok(CrawlOutcome::MalformedRecord) => {
                StageResponse::bad_request("invalid job record: missing website_url")
            }
            Ok(CrawlOutcome::Committed { url, stored_key }) => {
                self.notify(&url, &stored_key).await;
                StageResponse::ok(format!("crawling complete for {url}"))
            }
            Err(e) => {
                error!(error = %e, "crawl stage failed");
                StageResponse::failure(&e)
            }
        }
    }

    async fn execute(&self) -> Result<CrawlOutcome> {
        let mut ledger = self.ledger.load().await?;

        let Some(record) = ledger.next_crawl_pending() else {
            return Ok(CrawlOutcome::NothingToDo);
        };

        let url = record.website_url.clone();
        if url.trim().is_empty() {
            error!("job record has an empty website_url");
            return Ok(CrawlOutcome::MalformedRecord);
        }

        info!(%url, "starting crawl");
        let content = self.fetcher.fetch(&url).await?;

        // The fetcher caches an empty page as a success; for the stage it is
        // a failure — a record is never marked extracted without content.
        if content.is_empty() {
            return Err(QuizForgeError::EmptyContent { url });
        }

        let stored_key = self.blobs.put(NS_INTERMEDIATE, &url, &content).await?;
        info!(%url, key = %stored_key, "intermediate content stored");

        record.mark_extracted(&stored_key);
        self.ledger.save(&ledger).await?;
        info!(%url, "crawl committed");

        Ok(CrawlOutcome::Committed { url, stored_key })
    }

    /// Fire-and-forget hand-off to the quiz stage. A notify failure is
    /// logged and never fails the stage.
    async fn notify(&self, url: &str, stored_key: &str) {
        let Some(trigger) = self.trigger else {
            info!("no trigger configured, skipping quiz hand-off");
            return;
        };

        let payload = TriggerPayload {
            website_url: url.to_string(),
            intermediate_key: stored_key.to_string(),
        };

        match trigger.notify(&payload).await {
            Ok(()) => info!(%url, "quiz stage notified"),
            Err(e) => warn!(%url, error = %e, "quiz trigger notify failed, continuing"),
        }
    }
}
