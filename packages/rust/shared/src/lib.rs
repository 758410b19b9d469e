//! Shared types, error model, and configuration for QuizForge.
//!
//! This crate is the foundation depended on by all other QuizForge crates.
//! It provides:
//! - [`QuizForgeError`] — the unified error type
//! - Domain types ([`JobRecord`], [`JobLedger`])
//! - Configuration ([`AppConfig`], config loading and validation)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FetchConfig, GeminiConfig, StorageConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_config,
};
pub use error::{QuizForgeError, Result};
pub use types::{JobLedger, JobRecord};
