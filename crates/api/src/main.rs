use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use folio_api::app::{AppServices, build_app};
use folio_infra::AppConfig;

/// How long queued revalidations may take to flush on shutdown.
const REVALIDATION_DRAIN: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    folio_observability::init();
    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env file"),
        Err(e) if e.not_found() => tracing::info!("no .env file found"),
        Err(e) => tracing::warn!(error = %e, "failed to read .env file"),
    }

    let config = AppConfig::from_env()?;
    let (services, revalidation) = AppServices::connect(&config)
        .await
        .with_context(|| format!("failed to open database at {}", config.database_url))?;

    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    if !revalidation.drain(REVALIDATION_DRAIN).await {
        tracing::warn!("revalidation queue not drained before shutdown");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
