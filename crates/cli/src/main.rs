//! Pinecone CLI
//!
//! Main entry point for the `pinecone` command-line tool.
//! Queries an index, either one namespace or many at once.

mod commands;

use clap::{Parser, Subcommand};
use commands::{QueryCommand, QueryNamespacesCommand};
use pinecone_core::{config::ClientConfig, logging};
use std::path::PathBuf;
use tracing::Instrument;

/// Pinecone CLI - query vector indexes from the terminal
#[derive(Parser, Debug)]
#[command(name = "pinecone")]
#[command(about = "Query Pinecone indexes from the command line", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(short, long, global = true, env = "PINECONE_CONFIG")]
    config: Option<PathBuf>,

    /// Index host (e.g. my-index-abc123.svc.pinecone.io)
    #[arg(long, global = true, env = "PINECONE_INDEX_HOST")]
    host: Option<String>,

    /// API key
    #[arg(long, global = true, env = "PINECONE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum number of concurrent namespace requests
    #[arg(long, global = true, env = "PINECONE_POOL_THREADS")]
    pool_threads: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "PINECONE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Query a single namespace
    Query(QueryCommand),

    /// Query several namespaces in parallel and merge the results
    QueryNamespaces(QueryNamespacesCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from the config file and environment
    let config = ClientConfig::load_from(cli.config)?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.host,
        cli.api_key,
        cli.pool_threads,
        cli.timeout_secs,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("Host: {}", config.host);
    tracing::debug!("Pool threads: {}", config.pool_threads);

    let command_name = match &cli.command {
        Commands::Query(_) => "query",
        Commands::QueryNamespaces(_) => "query-namespaces",
    };
    let span = tracing::info_span!("command", name = command_name);

    // Route to command handlers
    let result = async {
        match cli.command {
            Commands::Query(cmd) => cmd.execute(&config).await,
            Commands::QueryNamespaces(cmd) => cmd.execute(&config).await,
        }
    }
    .instrument(span)
    .await;

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {:#}", e),
    }

    result
}
