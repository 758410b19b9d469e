//! QuizForge CLI — crawl websites and generate assessment quizzes.
//!
//! Walks a shared job ledger through two resumable stages: content
//! extraction and LLM quiz generation.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
