//! Application configuration for QuizForge.
//!
//! User config lives at `~/.quizforge/quizforge.toml`.
//! The Gemini API key is never stored in the file; the config only names the
//! environment variable that holds it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QuizForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "quizforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".quizforge";

// ---------------------------------------------------------------------------
// Config structs (matching quizforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Gemini settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Fetch retry settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Optional endpoint notified after a successful crawl commit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_url: Option<String>,
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Use S3 object storage (true) or the local filesystem (false).
    #[serde(default = "default_true")]
    pub use_s3: bool,

    /// S3 bucket name. Required when `use_s3` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,

    /// Key of the job ledger document within the store.
    #[serde(default = "default_ledger_key")]
    pub ledger_key: String,

    /// Root directory for local-mode results.
    #[serde(default = "default_local_root")]
    pub local_root: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            use_s3: true,
            bucket: None,
            ledger_key: default_ledger_key(),
            local_root: default_local_root(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_ledger_key() -> String {
    "config/ledger.json".into()
}
fn default_local_root() -> String {
    "results".into()
}

/// `[gemini]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model ID used for quiz generation.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
        }
    }
}

fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".into()
}
fn default_model() -> String {
    "gemini-1.5-pro".into()
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum fetch attempts per URL.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1000
}

impl FetchConfig {
    /// Retry delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.quizforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| QuizForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.quizforge/quizforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| QuizForgeError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| QuizForgeError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| QuizForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| QuizForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| QuizForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Validate startup requirements: the Gemini API key env var must be set and
/// non-empty, and S3 mode must name a bucket.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let var_name = &config.gemini.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => {}
        _ => {
            return Err(QuizForgeError::config(format!(
                "Gemini API key not found. Set the {var_name} environment variable."
            )));
        }
    }

    if config.storage.use_s3 && config.storage.bucket.as_deref().unwrap_or("").is_empty() {
        return Err(QuizForgeError::config(
            "storage.use_s3 is set but storage.bucket is missing",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("ledger_key"));
        assert!(toml_str.contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert!(parsed.storage.use_s3);
        assert_eq!(parsed.gemini.model, "gemini-1.5-pro");
        assert_eq!(parsed.fetch.max_attempts, 3);
        assert_eq!(parsed.fetch.retry_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn local_mode_config() {
        let toml_str = r#"
[storage]
use_s3 = false
local_root = "/tmp/quizforge"
ledger_key = "ledger.json"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(!config.storage.use_s3);
        assert_eq!(config.storage.local_root, "/tmp/quizforge");
        assert_eq!(config.storage.ledger_key, "ledger.json");
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let mut config = AppConfig::default();
        config.storage.use_s3 = false;
        // Use a unique env var name to avoid interfering with other tests
        config.gemini.api_key_env = "QF_TEST_NONEXISTENT_KEY_98765".into();
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }

    #[test]
    fn s3_mode_requires_bucket() {
        let mut config = AppConfig::default();
        config.gemini.api_key_env = "QF_TEST_PRESENT_KEY_13579".into();
        unsafe { std::env::set_var("QF_TEST_PRESENT_KEY_13579", "dummy") };

        config.storage.use_s3 = true;
        config.storage.bucket = None;
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("bucket"));

        config.storage.bucket = Some("quiz-artifacts".into());
        assert!(validate_config(&config).is_ok());
    }
}
