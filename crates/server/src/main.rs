//! Zenith AI backend server.
//!
//! Answers natural-language questions about inventory and order data by
//! retrieving the most relevant database rows from an in-memory vector index
//! and conditioning a hosted completion model on them.

mod intent;
mod prompt;
mod routes;
mod store;

use clap::Parser;
use routes::AppState;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use std::sync::Arc;
use store::{PgDataSource, PgTaskStore};
use zenith_core::{config::AppConfig, logging, AppError, AppResult};
use zenith_retrieval::{create_provider, RetrievalIndex};

/// Zenith AI backend - AI operations & RAG engine
#[derive(Parser, Debug)]
#[command(name = "zenith-server")]
#[command(about = "AI operations & RAG engine for inventory and orders", long_about = None)]
#[command(version)]
struct Cli {
    /// Socket address to bind (e.g., 0.0.0.0:8000)
    #[arg(short, long, env = "ZENITH_LISTEN")]
    listen: Option<String>,

    /// Path to config file
    #[arg(short, long, env = "ZENITH_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    no_color: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?.with_overrides(
        cli.listen,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::info!("Zenith AI backend starting");
    tracing::debug!("Embedding provider: {}", config.embedding.provider);
    tracing::debug!("Chat provider: {}", config.chat.provider);

    let state = build_state(&config)?;

    // Auto-index on startup so data is present before the first chat turn.
    // A failure here is not fatal: the index stays empty until a re-index
    // request succeeds.
    if let Err(err) = state.index.rebuild().await {
        tracing::warn!("Initial indexing failed: {}", err);
    }

    let app = routes::router(state);
    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .map_err(AppError::Io)?;

    tracing::info!("Listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Io)?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Wire up the process-wide state: the connection pool, the provider clients,
/// and the retrieval index. Missing provider credentials disable the feature
/// with a warning instead of failing startup.
fn build_state(config: &AppConfig) -> AppResult<Arc<AppState>> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)
        .map_err(|e| AppError::Store(format!("Invalid DATABASE_URL: {}", e)))?;

    let provider = match create_provider(&config.embedding, config.google_api_key.as_deref()) {
        Ok(provider) => Some(provider),
        Err(err) if err.is_configuration() => {
            tracing::warn!("Embeddings disabled: {}", err);
            None
        }
        Err(err) => return Err(err),
    };

    let llm = match zenith_llm::create_client(
        &config.chat.provider,
        config.chat.endpoint.as_deref(),
        config.groq_api_key.as_deref(),
    ) {
        Ok(client) => Some(client),
        Err(err) if err.is_configuration() => {
            tracing::warn!("Chat completions disabled: {}", err);
            None
        }
        Err(err) => return Err(err),
    };

    let source = Arc::new(PgDataSource::new(pool.clone()));
    let index = Arc::new(RetrievalIndex::new(provider, source, config.top_k));
    let tasks = Arc::new(PgTaskStore::new(pool));

    Ok(Arc::new(AppState {
        index,
        llm,
        tasks,
        chat: config.chat.clone(),
    }))
}
