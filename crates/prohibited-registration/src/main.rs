//! Prohibited registration auditing service - Entry point.

use anyhow::{Context, Result};
use prohibited_registration::{
    api::{create_router, AppState},
    config::Config,
    PostgresAuditSink, Sinks, SlackAlertSink,
};
use slack_webhook::SlackWebhookClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log.level);

    info!("Starting prohibited registration service");
    info!(
        topic = %config.queue.topic_name,
        subscription = %config.queue.subscription_name,
        "Consuming topic subscription"
    );

    if config.storage.connection_string.is_none() {
        warn!("STORAGE__CONNECTION_STRING not configured - audit rows will be skipped");
    }
    if config.alert.webhook_url.is_none() {
        warn!("ALERT__WEBHOOK_URL not configured - Slack alerts will be skipped");
    }

    // One webhook client for the whole process
    let slack = SlackWebhookClient::new(config.alert.timeout)
        .context("Failed to create Slack webhook client")?;

    let sinks = Sinks::new(
        Arc::new(PostgresAuditSink::new(
            config.storage.connection_string.clone(),
        )),
        Arc::new(SlackAlertSink::new(slack, config.alert.webhook_url.clone())),
    );

    let state = AppState::new(sinks, config.queue.clone());
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
