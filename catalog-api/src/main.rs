//! catalog-api - Composer catalog HTTP service
//!
//! CRUD over composer records stored in SQLite, with input validation,
//! process-wide rate limiting and optional static asset serving.

use anyhow::{Context, Result};
use catalog_api::config::{Args, ServiceConfig};
use catalog_api::{build_router, AppState};
use catalog_common::config::TomlConfig;
use catalog_common::db::init_database;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before tracing so RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_api=info,catalog_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting composer catalog (catalog-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let args = Args::parse();
    let toml = match &args.config {
        Some(path) => TomlConfig::load_from(path),
        None => TomlConfig::load(),
    };
    let config = ServiceConfig::resolve(args, toml)?;

    info!("Database path: {}", config.database_path.display());
    let pool = match init_database(&config.database_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let mut state = AppState::new(pool.clone(), config.rate_limit_per_minute);
    info!(
        "Rate limit: {} requests/minute",
        config.rate_limit_per_minute
    );

    if let Some(dir) = config.static_dir {
        if dir.is_dir() {
            info!("Serving static assets from {}", dir.display());
            state = state.with_static_dir(dir);
        } else {
            warn!("Static asset directory {} not found; not serving assets", dir.display());
        }
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;
    info!("catalog-api listening on {}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("catalog-api stopped; database pool closed");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM; in-flight requests then drain
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("catalog-api could not listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("catalog-api could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("catalog-api received Ctrl+C, draining requests"),
        _ = terminate => info!("catalog-api received SIGTERM, draining requests"),
    }
}
