//! `taskscribe serve` -- run the webhook server until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use taskscribe_core::date::SystemClock;
use taskscribe_types::config::AppConfig;

use crate::http::router::build_router;
use crate::state::AppState;

/// How long to wait for in-flight jobs after the listener closes.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub async fn serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    report_missing(&config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let clock = SystemClock::new(config.timezone);
    tracing::info!(timezone = %config.timezone, "dating pages");
    let (state, dispatcher) = AppState::init(config, Arc::new(clock));
    let router = build_router(state);

    tracing::info!(%addr, "webhook server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped, draining in-flight jobs");
    if tokio::time::timeout(DRAIN_TIMEOUT, dispatcher).await.is_err() {
        tracing::warn!(timeout_secs = DRAIN_TIMEOUT.as_secs(), "gave up waiting for in-flight jobs");
    }
    Ok(())
}

/// Log every unset setting once at startup.
fn report_missing(config: &AppConfig) {
    let status = config.status();
    let checks = [
        (status.notion_configured, "NOTION_TOKEN"),
        (status.claude_configured, "ANTHROPIC_API_KEY"),
        (status.parent_page_configured, "NOTION_PARENT_PAGE_ID"),
        (status.database_configured, "NOTION_DATABASE_ID"),
    ];
    for (present, key) in checks {
        if !present {
            tracing::warn!(key, "required setting is not configured");
        }
    }
    if !status.webhook_secret_configured {
        tracing::warn!("WEBHOOK_SECRET is not set, webhook signatures will not be verified");
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received");
}
