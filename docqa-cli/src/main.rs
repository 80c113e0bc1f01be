//! docqa — question answering over a single document, from the command line.
//!
//! `docqa index report.pdf` builds and persists the vector index once;
//! `docqa ask report.pdf "What was Q2 revenue?"` builds (or reloads) the
//! index and answers one question. Every fatal error is rendered as a
//! user-visible message.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use docqa_core::{API_KEY_VAR, CredentialProvider, EnvCredential, StaticCredential};
use docqa_model::OpenAiChatModel;
use docqa_rag::{
    Answerer, DocumentIndex, IndexOutcome, Indexer, OpenAiEmbedder, RagConfig, index_location,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docqa", version, about = "Ask questions about a document")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and persist the vector index for a document
    Index {
        /// Path to the document (PDF)
        file: std::path::PathBuf,
    },
    /// Answer a question about a document
    Ask {
        /// Path to the document (PDF)
        file: std::path::PathBuf,
        /// The question to answer
        question: String,
        /// How many chunks to retrieve as context
        #[arg(long, default_value_t = 4)]
        top_k: usize,
        /// Reload the previously persisted index instead of rebuilding
        #[arg(long)]
        reuse_index: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // One credential for both backends, resolved exactly once per process.
    let credentials = resolve_credentials()?;
    let embedder = Arc::new(OpenAiEmbedder::new(&credentials)?);

    match cli.command {
        Commands::Index { file } => {
            let index = build_index(&file, embedder).await?;
            println!(
                "Indexed {} chunks to {}",
                index.chunk_count(),
                index.location().display()
            );
        }
        Commands::Ask {
            file,
            question,
            top_k,
            reuse_index,
        } => {
            let index = if reuse_index {
                DocumentIndex::load(index_location(&file))
                    .await
                    .with_context(|| {
                        format!("no reusable index found for '{}'", file.display())
                    })?
            } else {
                build_index(&file, embedder.clone()).await?
            };

            let model = Arc::new(OpenAiChatModel::new(&credentials)?);
            let answerer = Answerer::builder()
                .embedding_provider(embedder)
                .chat_model(model)
                .top_k(top_k)
                .build()?;

            let answer = answerer.answer(&index, &question).await?;
            println!("{answer}");
        }
    }

    Ok(())
}

/// Build and persist the index for `file`, exactly once.
async fn build_index(
    file: &Path,
    embedder: Arc<OpenAiEmbedder>,
) -> anyhow::Result<DocumentIndex> {
    let indexer = Indexer::builder()
        .config(RagConfig::default())
        .embedding_provider(embedder)
        .build()?;

    match indexer.build_index(file).await? {
        IndexOutcome::Built(index) => Ok(index),
        IndexOutcome::Unsupported { extension } => {
            if extension.is_empty() {
                bail!(
                    "'{}' has no file extension. Currently, only PDF files are handled.",
                    file.display()
                );
            }
            bail!("Unsupported file format '.{extension}'. Currently, only PDF files are handled.");
        }
    }
}

/// Resolve the API key: environment variable first, otherwise prompt once.
fn resolve_credentials() -> anyhow::Result<StaticCredential> {
    if let Ok(key) = EnvCredential::new().api_key() {
        return Ok(StaticCredential::new(key));
    }

    let mut editor = rustyline::DefaultEditor::new()
        .context("failed to open the terminal to prompt for the API key")?;
    let key = editor
        .readline(&format!("{API_KEY_VAR} is not set. Enter your OpenAI API key: "))
        .context("no API key provided")?;
    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("no API key provided");
    }
    Ok(StaticCredential::new(key))
}

/// Logs go to stderr so answers on stdout stay clean.
fn init_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
