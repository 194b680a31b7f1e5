use std::sync::Arc;

use scylla::client::session::Session;
use scylla::client::session_builder::SessionBuilder;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use order_lifecycle::config::{AppConfig, ScyllaConfig};
use order_lifecycle::domain::order::OrderService;
use order_lifecycle::metrics::Metrics;
use order_lifecycle::repository::ScyllaOrderRepository;
use order_lifecycle::utils::{retry_with_backoff, RetryConfig};

async fn connect_scylla(config: &ScyllaConfig) -> anyhow::Result<Session> {
    let retry = RetryConfig::from(&config.connect_retry);

    let session = retry_with_backoff("scylla_connect", &retry, |attempt| {
        tracing::info!(attempt = attempt, nodes = ?config.known_nodes, "Connecting to ScyllaDB...");
        let builder = SessionBuilder::new().known_nodes(&config.known_nodes);
        async move { builder.build().await }
    })
    .await?;

    Ok(session)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // RUST_LOG takes precedence over the configured filter
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .init();

    tracing::info!("Starting order lifecycle service");

    // === 1. Storage ===
    let session = Arc::new(connect_scylla(&config.scylla).await?);
    let repository = ScyllaOrderRepository::new(session);
    repository
        .ensure_schema(&config.scylla.keyspace, config.scylla.replication_factor)
        .await?;

    // === 2. Metrics ===
    let metrics = Arc::new(Metrics::new()?);
    tracing::info!("Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 3. Order service ===
    let service = Arc::new(OrderService::new(Arc::new(repository), metrics));

    // === 4. HTTP ===
    order_lifecycle::http::start_server(service, &config.http.host, config.http.port).await?;

    tracing::info!("Order lifecycle service stopped");
    Ok(())
}
