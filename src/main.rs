//! rustbibfetch - Academic BibTeX Fetch & Merge Pipeline
//!
//! Fetches BibTeX citation text for papers listed in a CSV dataset and
//! merges the results into an output CSV, resuming safely across
//! interrupted runs.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! rustbibfetch fetch --profile conference
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! rustbibfetch serve --port 3000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use clap::{Parser, Subcommand};
use rustbibfetch::{
    config::{JobConfig, Profile},
    fetch::{FetchBibtex, HttpFetcher},
    pipeline, stats,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Academic BibTeX Fetch & Merge Pipeline
#[derive(Parser)]
#[command(name = "rustbibfetch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch BibTeX data for every paper in the input CSV
    Fetch {
        /// Publication category: conference or journal
        #[arg(long, default_value = "conference", value_parser = ["conference", "journal"])]
        profile: String,

        /// Input CSV file with 'title' and 'bibtex_url' columns (default per profile)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV file with fetched BibTeX entries (default per profile)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report dataset statistics without fetching
    Stats {
        /// Publication category: conference or journal
        #[arg(long, default_value = "conference", value_parser = ["conference", "journal"])]
        profile: String,

        /// Input CSV file (default per profile)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output CSV file (default per profile)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Fetch {
            profile,
            input,
            output,
        } => {
            let config = resolve_config(&profile, input, output)?;
            run_fetch(config).await
        }
        Commands::Stats {
            profile,
            input,
            output,
        } => {
            let config = resolve_config(&profile, input, output)?;
            report_stats(&config)
        }
        Commands::Serve { port, host } => run_server(host, port).await,
    }
}

fn resolve_config(
    profile: &str,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<JobConfig> {
    let profile = match profile {
        "conference" => Profile::Conference,
        "journal" => Profile::Journal,
        other => anyhow::bail!("Invalid profile: {}", other),
    };

    Ok(JobConfig::for_profile(profile, input, output))
}

// ============================================================================
// Fetch Pipeline
// ============================================================================

async fn run_fetch(config: JobConfig) -> Result<()> {
    report_stats(&config)?;

    let fetcher = HttpFetcher::new().context("Failed to build HTTP fetcher")?;
    let summary = pipeline::run(&config, &fetcher)
        .await
        .context("Pipeline failed")?;

    println!(
        "\n✓ Processed {} rows: {} reused, {} fetched, {} unavailable, {} without URL",
        summary.total, summary.reused, summary.fetched, summary.unavailable, summary.no_url
    );
    println!("Results in: {}", config.output_path.display());
    Ok(())
}

fn report_stats(config: &JobConfig) -> Result<()> {
    let stats = stats::collect(&config.input_path, &config.output_path)
        .context("Failed to read datasets")?;

    println!(
        "Total entries in {}: {}",
        config.input_path.display(),
        stats.total_entries
    );
    println!(
        "Successfully fetched BibTeX entries in {}: {}",
        config.output_path.display(),
        stats.success_entries
    );
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(host: String, port: u16) -> Result<()> {
    info!(host = %host, port = port, "Starting HTTP server");
    println!("Starting server at http://{}:{}", host, port);

    let app_state = Arc::new(AppState {
        fetcher: HttpFetcher::new().context("Failed to build HTTP fetcher")?,
    });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/fetch", post(fetch_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

struct AppState {
    fetcher: HttpFetcher,
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Fetch request body
#[derive(Debug, Deserialize)]
struct FetchRequest {
    url: String,
}

/// Fetch response
#[derive(Debug, Serialize)]
struct FetchResponse {
    status: String,
    bibtex: Option<String>,
}

/// Fetch endpoint handler
async fn fetch_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FetchRequest>,
) -> Json<FetchResponse> {
    info!(url = %req.url, "Fetch request");

    match state.fetcher.fetch(&req.url).await {
        Some(bibtex) => Json(FetchResponse {
            status: "success".to_string(),
            bibtex: Some(bibtex),
        }),
        None => Json(FetchResponse {
            status: "not_found".to_string(),
            bibtex: None,
        }),
    }
}
