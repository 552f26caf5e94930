mod display;
mod workbench;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use clauseai_client::{AnalysisClient, ClientConfig, DEFAULT_BASE_URL};
use clauseai_store::{AnalysisOutcome, ClauseStore, run_analysis};
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::display::render_report;
use crate::workbench::Workbench;

#[derive(Parser)]
#[command(name = "clauseai", version, about = "Legal clause risk review workbench")]
struct Cli {
    /// Base URL of the analysis service.
    #[arg(long, global = true, env = "CLAUSEAI_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds. Unset waits indefinitely.
    #[arg(long, global = true, env = "CLAUSEAI_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive multi-clause review session (default)
    Workbench,
    /// Analyze a single clause and print the report
    Analyze {
        /// Clause text; omit when using --file
        text: Option<String>,
        /// Extract the clause from a PDF instead
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Print the raw verdict as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the text extracted from a PDF
    Extract {
        /// Path to a .pdf file
        path: PathBuf,
    },
    /// Check that the analysis service is up
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::new(cli.api_url);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.base_url,
        timeout_secs = ?cli.timeout_secs,
        "clauseai starting"
    );

    match cli.command.unwrap_or(Command::Workbench) {
        Command::Workbench => {
            let client = AnalysisClient::new(config).context("building HTTP client")?;
            let (workbench, outcomes) = Workbench::new(Arc::new(client));
            workbench.run(outcomes).await?;
        }
        Command::Analyze { text, file, json } => {
            let client = AnalysisClient::new(config).context("building HTTP client")?;
            analyze_once(&client, text, file, json).await?;
        }
        Command::Extract { path } => {
            let text = clauseai_extract::extract_file(&path)
                .await
                .with_context(|| format!("extracting {}", path.display()))?;
            println!("{text}");
        }
        Command::Health => {
            let client = AnalysisClient::new(config).context("building HTTP client")?;
            let health = client.health().await.context("health check")?;
            println!("{:<14} {}", "ok", health.ok);
            println!("{:<14} {}", "model", health.model.as_deref().unwrap_or("-"));
            println!(
                "{:<14} {}",
                "llm_base_url",
                health.llm_base_url.as_deref().unwrap_or("-")
            );
            match health.faiss_ntotal {
                Some(n) => println!("{:<14} {n}", "index size"),
                None => println!("{:<14} -", "index size"),
            }
        }
    }

    Ok(())
}

/// One-shot analysis through the same store lifecycle the workbench uses.
async fn analyze_once(
    client: &AnalysisClient,
    text: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let clause = match (text, file) {
        (_, Some(path)) => clauseai_extract::extract_file(&path)
            .await
            .with_context(|| format!("extracting {}", path.display()))?,
        (Some(text), None) => text,
        (None, None) => bail!("provide clause text or --file <PDF>"),
    };

    let mut store = ClauseStore::new();
    store.update_active_text(clause);
    let store = Mutex::new(store);

    match run_analysis(&store, client).await {
        None => bail!("clause text is empty"),
        Some(AnalysisOutcome::Failed { error, .. }) => {
            Err(anyhow::Error::new(error).context("analysis failed"))
        }
        Some(AnalysisOutcome::Discarded { .. }) => bail!("analysis result was discarded"),
        Some(AnalysisOutcome::Applied { .. }) => {
            let store = store.lock().await;
            let entry = store.active();
            if json {
                if let Some(results) = &entry.results {
                    println!("{}", serde_json::to_string_pretty(results)?);
                }
            } else {
                print!("{}", render_report(entry, true));
            }
            Ok(())
        }
    }
}
