//! Shared fakes and fixtures for stage tests.

use std::sync::Mutex;

use async_trait::async_trait;

use object_store::ObjectStore;
use object_store::path::Path;
use quizforge_shared::{JobLedger, QuizForgeError, Result, StorageConfig};
use quizforge_storage::{BlobStore, LedgerStore, build_object_store};

use crate::stage::{ContentFetcher, TextGenerator};
use crate::trigger::{StageTrigger, TriggerPayload};

/// A temp-dir backed blob store + ledger store pair.
pub struct TestStore {
    _dir: tempfile::TempDir,
    store: std::sync::Arc<dyn ObjectStore>,
    pub blobs: BlobStore,
    pub ledger: LedgerStore,
}

impl TestStore {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = StorageConfig {
            use_s3: false,
            bucket: None,
            ledger_key: "config/ledger.json".into(),
            local_root: dir.path().to_string_lossy().into_owned(),
        };

        let store = build_object_store(&config).expect("local store");
        Self {
            _dir: dir,
            store: store.clone(),
            blobs: BlobStore::new(store.clone()),
            ledger: LedgerStore::new(store, &config.ledger_key),
        }
    }

    /// Write the initial ledger document.
    pub async fn seed(&self, ledger: JobLedger) {
        self.ledger.save(&ledger).await.expect("seed ledger");
    }

    /// Write content at an exact storage key.
    pub async fn put_raw(&self, key: &str, content: &str) {
        self.store
            .put(&Path::from(key), content.as_bytes().to_vec().into())
            .await
            .expect("seed blob");
    }
}

/// Fetcher that always returns the same content.
pub struct StaticFetcher {
    content: String,
}

impl StaticFetcher {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<String> {
        Ok(self.content.clone())
    }
}

/// Fetcher that always reports exhausted retries.
pub struct FailingFetcher;

#[async_trait]
impl ContentFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Err(QuizForgeError::FetchExhausted {
            url: url.to_string(),
            attempts: 3,
            last_error: "simulated outage".into(),
        })
    }
}

/// Generator that returns fixed quiz text and records its inputs.
pub struct StaticGenerator {
    quiz: String,
    inputs: Mutex<Vec<String>>,
}

impl StaticGenerator {
    pub fn new(quiz: &str) -> Self {
        Self {
            quiz: quiz.to_string(),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().expect("lock").clone()
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, content: &str) -> Result<String> {
        self.inputs.lock().expect("lock").push(content.to_string());
        Ok(self.quiz.clone())
    }
}

/// Generator that always fails.
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _content: &str) -> Result<String> {
        Err(QuizForgeError::GenerationFailed("simulated model error".into()))
    }
}

/// Trigger that records every payload it receives.
pub struct RecordingTrigger {
    payloads: Mutex<Vec<TriggerPayload>>,
}

impl RecordingTrigger {
    pub fn new() -> Self {
        Self {
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn payloads(&self) -> Vec<TriggerPayload> {
        self.payloads.lock().expect("lock").clone()
    }
}

#[async_trait]
impl StageTrigger for RecordingTrigger {
    async fn notify(&self, payload: &TriggerPayload) -> Result<()> {
        self.payloads.lock().expect("lock").push(payload.clone());
        Ok(())
    }
}

/// Trigger whose delivery always fails.
pub struct FailingTrigger;

#[async_trait]
impl StageTrigger for FailingTrigger {
    async fn notify(&self, _payload: &TriggerPayload) -> Result<()> {
        Err(QuizForgeError::Network("quiz stage not reachable".into()))
    }
}
