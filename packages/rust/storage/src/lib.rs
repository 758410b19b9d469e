//! Durable content storage for QuizForge.
//!
//! Two interchangeable backends behind `object_store`: authenticated S3 for
//! deployed runs, a local filesystem prefix for local runs. The backend is
//! selected once at startup from config; nothing else branches on the mode.

mod keys;
mod ledger;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path;
use object_store::{BackoffConfig, ClientOptions, ObjectStore, PutPayload, RetryConfig};
use tracing::{debug, info};

use quizforge_shared::{QuizForgeError, Result, StorageConfig};

pub use keys::derive_key;
pub use ledger::LedgerStore;

/// Namespace for crawled page content.
pub const NS_INTERMEDIATE: &str = "intermediate";

/// Namespace for generated quiz text.
pub const NS_FINAL: &str = "final";

// ---------------------------------------------------------------------------
// Backend construction
// ---------------------------------------------------------------------------

/// Build the object store backend chosen by config.
///
/// S3 credentials and region come from the environment (AWS_ACCESS_KEY_ID,
/// AWS_SECRET_ACCESS_KEY, AWS_REGION) or the usual AWS config files.
pub fn build_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    if config.use_s3 {
        let bucket = config.bucket.as_deref().ok_or_else(|| {
            QuizForgeError::config("storage.use_s3 is set but storage.bucket is missing")
        })?;

        info!(bucket, "using S3 object store");
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_client_options(client_options())
            .with_retry(retry_config())
            .build()
            .map_err(|e| QuizForgeError::PersistenceFailed(format!("S3 client build: {e}")))?;

        Ok(Arc::new(store))
    } else {
        let root = std::path::Path::new(&config.local_root);
        if !root.exists() {
            std::fs::create_dir_all(root).map_err(|e| QuizForgeError::io(root, e))?;
        }

        info!(root = %root.display(), "using local filesystem store");
        let store = LocalFileSystem::new_with_prefix(root)
            .map_err(|e| QuizForgeError::PersistenceFailed(format!("local store: {e}")))?;

        Ok(Arc::new(store))
    }
}

fn client_options() -> ClientOptions {
    ClientOptions::new()
        .with_connect_timeout(Duration::from_secs(5))
        .with_timeout(Duration::from_secs(30))
}

fn retry_config() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        backoff: BackoffConfig {
            init_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(5),
            base: 2.0,
        },
        retry_timeout: Duration::from_secs(60),
    }
}

// ---------------------------------------------------------------------------
// BlobStore
// ---------------------------------------------------------------------------

/// Key-addressed put/get of text content over the configured backend.
pub struct BlobStore {
    store: Arc<dyn ObjectStore>,
}

impl BlobStore {
    /// A blob store over `store`.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Store `content` under a key derived from `url` in `namespace`.
    /// Returns the stored key for later [`get`](Self::get).
    pub async fn put(&self, namespace: &str, url: &str, content: &str) -> Result<String> {
        let key = derive_key(namespace, url, Utc::now());

        self.store
            .put(&Path::from(key.as_str()), PutPayload::from(content.as_bytes().to_vec()))
            .await
            .map_err(|e| {
                QuizForgeError::PersistenceFailed(format!("write at '{key}': {e}"))
            })?;

        debug!(key, len = content.len(), "content stored");
        Ok(key)
    }

    /// Read the content stored at `stored_key`.
    pub async fn get(&self, stored_key: &str) -> Result<String> {
        let result = self
            .store
            .get(&Path::from(stored_key))
            .await
            .map_err(|e| QuizForgeError::retrieval(stored_key, e.to_string()))?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| QuizForgeError::retrieval(stored_key, e.to_string()))?;

        String::from_utf8(bytes.to_vec())
            .map_err(|e| QuizForgeError::retrieval(stored_key, format!("not UTF-8: {e}")))
    }
}
