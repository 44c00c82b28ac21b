mod config;
mod logging;
mod signals;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use clap::{Parser, Subcommand};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use users_directory::UsersDirectory;
use users_directory::module::StorageBackend;

use crate::config::AppConfig;

/// Users Directory Server - create, update, delete and list users over HTTP
#[derive(Parser)]
#[command(name = "users-directory-server")]
#[command(about = "Users Directory Server - create, update, delete and list users over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override, e.g. 0.0.0.0:8087 (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Keep users in process memory instead of the configured database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.bind.as_deref());

    logging::init_logging(&config.logging, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, cli.mock).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn build_router(module: &UsersDirectory, config: &AppConfig) -> Router {
    module
        .router()
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            config.server.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}

async fn run_server(config: AppConfig, mock: bool) -> Result<()> {
    config.validate()?;
    let addr = config.bind_addr()?;

    let backend = if mock {
        tracing::info!("Mock mode enabled: users are kept in memory");
        StorageBackend::Memory
    } else {
        StorageBackend::Database
    };
    let module = UsersDirectory::init(&config.users_directory, backend).await?;
    let router = build_router(&module, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "Users directory server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = signals::wait_for_shutdown().await {
                tracing::error!(error = %e, "Signal handling failed; shutting down");
            }
        })
        .await
        .context("HTTP server failed")?;

    tracing::info!("Users directory server stopped");
    Ok(())
}
