//! CLI command definitions, routing, and tracing setup.

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use quizforge_core::{CrawlStage, QuizStage, StageResponse, StageTrigger, WebhookTrigger};
use quizforge_fetcher::Fetcher;
use quizforge_quizgen::GeminiClient;
use quizforge_shared::{
    AppConfig, JobRecord, init_config, load_config, validate_config,
};
use quizforge_storage::{BlobStore, LedgerStore, build_object_store};
use tracing::info;
use url::Url;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// QuizForge — turn websites into lead-qualification quizzes.
#[derive(Parser)]
#[command(
    name = "quizforge",
    version,
    about = "Crawl websites and generate assessment quizzes from their content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Queue a website URL for processing.
    Add {
        /// Website URL to crawl and turn into a quiz.
        url: String,
    },

    /// Run the crawl stage: fetch and store content for one pending URL.
    Crawl,

    /// Run the quiz stage: generate a quiz for one crawled URL.
    Quiz,

    /// Run both stages back to back.
    Run,

    /// Show the state of every job in the ledger.
    Status,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "quizforge=info",
        1 => "quizforge=debug",
        _ => "quizforge=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Add { url } => cmd_add(&url).await,
        Command::Crawl => cmd_crawl().await,
        Command::Quiz => cmd_quiz().await,
        Command::Run => cmd_run().await,
        Command::Status => cmd_status().await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Shared wiring
// ---------------------------------------------------------------------------

/// Blob and ledger stores opened from the resolved configuration.
struct Stores {
    blobs: BlobStore,
    ledger: LedgerStore,
}

fn open_stores(config: &AppConfig) -> Result<Stores> {
    let store = build_object_store(&config.storage)?;
    Ok(Stores {
        blobs: BlobStore::new(store.clone()),
        ledger: LedgerStore::new(store, &config.storage.ledger_key),
    })
}

fn spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(80));
    bar.set_message(msg.to_string());
    bar
}

/// Print a stage outcome; a non-2xx status becomes a CLI error so the
/// process exits non-zero.
fn report(stage: &str, response: &StageResponse) -> Result<()> {
    if response.is_success() {
        println!("  {stage}: {}", response.body);
        Ok(())
    } else {
        Err(eyre!(
            "{stage} stage failed ({}): {}",
            response.status_code,
            response.body
        ))
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_add(url: &str) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(eyre!("invalid URL '{url}': expected http or https"));
    }

    let config = load_config()?;
    let stores = open_stores(&config)?;

    let mut ledger = stores.ledger.load_or_default().await?;
    ledger.push(JobRecord::new(url));
    stores.ledger.save(&ledger).await?;

    info!(url, total = ledger.len(), "queued website");
    println!("  Queued {url} ({} job(s) in ledger)", ledger.len());
    Ok(())
}

async fn cmd_crawl() -> Result<()> {
    let config = load_config()?;
    validate_config(&config)?;
    let stores = open_stores(&config)?;

    let fetcher = Fetcher::from_config(&config.fetch)?;
    let trigger = match &config.trigger_url {
        Some(endpoint) => Some(WebhookTrigger::new(endpoint)?),
        None => None,
    };

    let mut stage = CrawlStage::new(&fetcher, &stores.blobs, &stores.ledger);
    if let Some(t) = &trigger {
        stage = stage.with_trigger(t as &dyn StageTrigger);
    }

    let bar = spinner("Crawling...");
    let response = stage.run().await;
    bar.finish_and_clear();

    report("crawl", &response)
}

async fn cmd_quiz() -> Result<()> {
    let config = load_config()?;
    validate_config(&config)?;
    let stores = open_stores(&config)?;

    let generator = GeminiClient::from_config(&config.gemini)?;
    let stage = QuizStage::new(&generator, &stores.blobs, &stores.ledger);

    let bar = spinner("Generating quiz...");
    let response = stage.run().await;
    bar.finish_and_clear();

    report("quiz", &response)
}

async fn cmd_run() -> Result<()> {
    cmd_crawl().await?;
    cmd_quiz().await
}

async fn cmd_status() -> Result<()> {
    let config = load_config()?;
    let stores = open_stores(&config)?;

    let ledger = stores.ledger.load_or_default().await?;
    if ledger.is_empty() {
        println!("  Ledger is empty. Queue a website with `quizforge add <url>`.");
        return Ok(());
    }

    println!();
    for record in ledger.records() {
        let state = if record.quiz_created {
            "quiz ready"
        } else if record.extracted {
            "crawled"
        } else {
            "queued"
        };
        println!("  [{state:>10}] {}", record.website_url);
        if let Some(key) = &record.intermediate_result {
            println!("               content: {key}");
        }
        if let Some(key) = &record.final_result {
            println!("               quiz:    {key}");
        }
    }
    println!();
    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
