use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

use vlo_core::repository::MySqlRepository;
use vlo_core::{Engine, FormatRegistry};
use vlo_server::cli::Cli;
use vlo_server::config::AppConfig;
use vlo_server::AppState;

const MAX_RETRIES: u32 = 10;
const RETRY_INTERVAL: Duration = Duration::from_secs(3);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => Some(sigterm),
        Err(e) => {
            tracing::warn!(error = %e, "failed to register SIGTERM handler");
            None
        }
    };
    let terminate = async {
        match sigterm.as_mut() {
            Some(sigterm) => {
                sigterm.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received SIGINT, shutting down");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, shutting down");
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match AppConfig::from_env() {
        Ok(config) => config.with_cli(&cli),
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!("connecting to database...");

    let mut repository = None;
    for attempt in 1..=MAX_RETRIES {
        match MySqlRepository::connect(&config.database).await {
            Ok(repo) => {
                repository = Some(repo);
                break;
            }
            Err(e) => {
                tracing::warn!(attempt, error = %e, "failed to connect, retrying...");
                if attempt == MAX_RETRIES {
                    tracing::error!("exhausted all {MAX_RETRIES} connection attempts");
                    std::process::exit(1);
                }
                tokio::time::sleep(RETRY_INTERVAL).await;
            }
        }
    }
    let repository = repository.unwrap_or_else(|| {
        tracing::error!("unreachable: no repository after retry loop");
        std::process::exit(1);
    });

    tracing::info!("connected to database");

    let formats = FormatRegistry::standard(&config.repository, &config.metadata);
    let engine = Engine::new(Arc::new(repository), formats, config.repository.clone());
    let app = vlo_server::app(AppState::new(engine), config.request_timeout);

    let addr = config.listen_addr;
    tracing::info!(
        base_url = %config.repository.oai_url(),
        request_timeout = ?config.request_timeout,
        "listening on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to bind on {addr}");
            std::process::exit(1);
        });

    let stopping = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let stopping = Arc::clone(&stopping);
            async move {
                shutdown_signal().await;
                stopping.notify_one();
            }
        })
        .into_future();

    // open connections get SHUTDOWN_TIMEOUT to finish once a signal arrives
    let deadline = async {
        stopping.notified().await;
        tokio::time::sleep(SHUTDOWN_TIMEOUT).await;
    };

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        () = deadline => {
            tracing::warn!("shutdown timed out after {SHUTDOWN_TIMEOUT:?}, dropping open connections");
        }
    }

    tracing::info!("server stopped");
}
