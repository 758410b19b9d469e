//! Pipeline stage orchestration for QuizForge.
//!
//! This crate ties the fetcher, blob store, ledger, and quiz generator into
//! the two stage runners ([`CrawlStage`], [`QuizStage`]) and the optional
//! cross-stage hand-off ([`trigger`]).

pub mod crawl;
pub mod quiz;
pub mod stage;
pub mod trigger;

#[cfg(test)]
pub(crate) mod testutil;

pub use crawl::CrawlStage;
pub use quiz::QuizStage;
pub use stage::{ContentFetcher, StageResponse, TextGenerator};
pub use trigger::{StageTrigger, TriggerPayload, WebhookTrigger};
