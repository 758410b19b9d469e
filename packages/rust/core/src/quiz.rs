//! Quiz stage: select → retrieve → generate → persist → commit.
//!
//! Same commit discipline as the crawl stage: the ledger is saved only after
//! the quiz text is durably stored, so a failure at any earlier step leaves
//! the stored ledger untouched and the stage idempotent to re-invoke.

use tracing::{error, info, instrument};

use quizforge_shared::{QuizForgeError, Result};
use quizforge_storage::{BlobStore, LedgerStore, NS_FINAL};

use crate::stage::{StageResponse, TextGenerator};

enum QuizOutcome {
    NothingToDo,
    MalformedRecord,
    Committed { url: String },
}

/// The quiz stage runner.
pub struct QuizStage<'a, G: TextGenerator> {
    generator: &'a G,
    blobs: &'a BlobStore,
    ledger: &'a LedgerStore,
}

impl<'a, G: TextGenerator> QuizStage<'a, G> {
    pub fn new(generator: &'a G, blobs: &'a BlobStore, ledger: &'a LedgerStore) -> Self {
        Self {
            generator,
            blobs,
            ledger,
        }
    }

    /// Run the stage once. Never returns an error; failures are folded into
    /// the response.
    #[instrument(skip_all)]
    pub async fn run(&self) -> StageResponse {
        info!("quiz stage triggered");

        match self.execute().await {
            Ok(QuizOutcome::NothingToDo) => {
                info!("no pending record for quiz creation");
                StageResponse::ok("no pending record to process")
            }
            Ok(QuizOutcome::MalformedRecord) => {
                StageResponse::bad_request("invalid job record: missing website_url")
            }
            Ok(QuizOutcome::Committed { url }) => {
                StageResponse::ok(format!("quiz created for {url}"))
            }
            Err(e) => {
                error!(error = %e, "quiz stage failed");
                StageResponse::failure(&e)
            }
        }
    }

    async fn execute(&self) -> Result<QuizOutcome> {
        let mut ledger = self.ledger.load().await?;

        let Some(record) = ledger.next_quiz_pending() else {
            return Ok(QuizOutcome::NothingToDo);
        };

        let url = record.website_url.clone();
        if url.trim().is_empty() {
            error!("job record has an empty website_url");
            return Ok(QuizOutcome::MalformedRecord);
        }

        // Selection guarantees the key is present
        let Some(stored_key) = record.intermediate_result.clone() else {
            return Ok(QuizOutcome::MalformedRecord);
        };

        info!(%url, key = %stored_key, "retrieving intermediate content");
        let content = self.blobs.get(&stored_key).await?;
        if content.is_empty() {
            return Err(QuizForgeError::retrieval(
                &stored_key,
                "intermediate content is empty",
            ));
        }

        info!(%url, "generating quiz");
        let quiz = self.generator.generate(&content).await?;

        let final_key = self.blobs.put(NS_FINAL, &url, &quiz).await?;
        info!(%url, key = %final_key, "final quiz stored");

        record.mark_quiz_created(&final_key);
        self.ledger.save(&ledger).await?;
        info!(%url, "quiz committed");

        Ok(QuizOutcome::Committed { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quizforge_shared::{JobLedger, JobRecord};

    use crate::testutil::{FailingGenerator, StaticGenerator, TestStore};

    fn crawled_record(url: &str, key: &str) -> JobRecord {
        let mut record = JobRecord::new(url);
        record.mark_extracted(key);
        record
    }

    #[tokio::test]
    async fn quiz_commits_record_and_stores_output() {
        let env = TestStore::new().await;
        env.put_raw("k1", "hello").await;
        env.seed(JobLedger(vec![crawled_record("https://a.example", "k1")]))
            .await;

        let generator = StaticGenerator::new("Q1. What is a widget?");
        let response = QuizStage::new(&generator, &env.blobs, &env.ledger).run().await;

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("https://a.example"));

        let ledger = env.ledger.load().await.expect("reload");
        let record = &ledger.0[0];
        assert!(record.quiz_created);
        let key = record.final_result.as_deref().expect("final key");
        assert!(key.starts_with("final/a.example_"));
        assert_eq!(
            env.blobs.get(key).await.expect("quiz"),
            "Q1. What is a widget?"
        );
        // Generator saw the retrieved intermediate content
        assert_eq!(generator.inputs(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn no_pending_record_is_a_success_noop() {
        let env = TestStore::new().await;
        let seeded = JobLedger(vec![JobRecord::new("https://a.example")]);
        env.seed(seeded.clone()).await;

        let generator = StaticGenerator::new("unused");
        let response = QuizStage::new(&generator, &env.blobs, &env.ledger).run().await;

        assert_eq!(response.status_code, 200);
        assert!(response.body.contains("no pending record"));
        assert_eq!(env.ledger.load().await.expect("reload"), seeded);
    }

    #[tokio::test]
    async fn missing_intermediate_content_is_terminal() {
        let env = TestStore::new().await;
        let seeded = JobLedger(vec![crawled_record("https://a.example", "gone/k1")]);
        env.seed(seeded.clone()).await;

        let generator = StaticGenerator::new("unused");
        let response = QuizStage::new(&generator, &env.blobs, &env.ledger).run().await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("gone/k1"));
        assert_eq!(env.ledger.load().await.expect("reload"), seeded);
        assert!(generator.inputs().is_empty());
    }

    #[tokio::test]
    async fn generation_failure_leaves_ledger_unmodified() {
        let env = TestStore::new().await;
        env.put_raw("k1", "hello").await;
        let seeded = JobLedger(vec![crawled_record("https://a.example", "k1")]);
        env.seed(seeded.clone()).await;

        let generator = FailingGenerator;
        let response = QuizStage::new(&generator, &env.blobs, &env.ledger).run().await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("quiz generation failed"));

        // Idempotence: the record is still quiz-pending
        let mut ledger = env.ledger.load().await.expect("reload");
        assert_eq!(ledger, seeded);
        assert!(ledger.next_quiz_pending().is_some());
    }

    #[tokio::test]
    async fn empty_intermediate_content_is_terminal() {
        let env = TestStore::new().await;
        env.put_raw("k1", "").await;
        let seeded = JobLedger(vec![crawled_record("https://a.example", "k1")]);
        env.seed(seeded.clone()).await;

        let generator = StaticGenerator::new("unused");
        let response = QuizStage::new(&generator, &env.blobs, &env.ledger).run().await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("intermediate content is empty"));
        assert_eq!(env.ledger.load().await.expect("reload"), seeded);
    }

    #[tokio::test]
    async fn records_are_processed_in_ledger_order() {
        let env = TestStore::new().await;
        env.put_raw("ka", "content a").await;
        env.put_raw("kb", "content b").await;
        env.seed(JobLedger(vec![
            crawled_record("https://a.example", "ka"),
            crawled_record("https://b.example", "kb"),
        ]))
        .await;

        let generator = StaticGenerator::new("quiz");
        let response = QuizStage::new(&generator, &env.blobs, &env.ledger).run().await;
        assert!(response.body.contains("https://a.example"));

        let ledger = env.ledger.load().await.expect("reload");
        assert!(ledger.0[0].quiz_created);
        assert!(!ledger.0[1].quiz_created);
    }
}
