//! StaffHub backend server.
//!
//! Wires the outbox relay and the history projector against PostgreSQL and
//! NATS, then runs both until interrupted.

mod config;

use clap::Parser;
use config::AppConfig;
use sqlx::postgres::PgPoolOptions;
use staffhub_domain::event_bus::EventBus;
use staffhub_domain::outbox::OutboxRepository;
use staffhub_infrastructure::messaging::{EventDescriber, HistoryProjector, NatsEventBus, OutboxRelay};
use staffhub_infrastructure::persistence::dead_letter::PostgresDeadLetterRepository;
use staffhub_infrastructure::persistence::employees::PostgresEmployeeRepository;
use staffhub_infrastructure::persistence::history::PostgresHistoryRepository;
use staffhub_infrastructure::persistence::outbox::PostgresOutboxRepository;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info};

/// CLI arguments for staffhub-server
#[derive(clap::Parser, Debug)]
#[command(name = "staffhub-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "StaffHub HR backend server", long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = AppConfig::load()?;
    setup_logging(args.debug, &config.log_level);

    info!("Starting StaffHub server");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;

    let outbox = PostgresOutboxRepository::new(pool.clone());
    outbox.run_migrations().await?;
    let history = PostgresHistoryRepository::new(pool.clone());
    history.run_migrations().await?;
    let dead_letters = PostgresDeadLetterRepository::new(pool.clone());
    dead_letters.run_migrations().await?;
    let employees = PostgresEmployeeRepository::new(pool.clone());
    employees.run_migrations().await?;
    info!("Database migrations complete");

    let bus = NatsEventBus::connect(&config.nats).await?;
    info!(url = config.nats.primary_url(), "Connected to NATS");

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let relay = Arc::new(OutboxRelay::new(
        Arc::new(outbox) as Arc<dyn OutboxRepository>,
        Arc::new(bus.clone()) as Arc<dyn EventBus>,
        config.relay.relay_config(),
        config.relay.retry_policy(),
    ));
    let relay_task = {
        let relay = Arc::clone(&relay);
        tokio::spawn(async move { relay.run().await })
    };

    let consumer = bus.consumer(&config.consumer.group).await?;
    let projector = HistoryProjector::new(
        Arc::new(history),
        Arc::new(dead_letters),
        EventDescriber::new(),
    );
    let projector_task = {
        let shutdown_rx = shutdown_tx.subscribe();
        tokio::spawn(async move { projector.run(consumer, shutdown_rx).await })
    };

    info!("Relay and projector running");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");

    relay.shutdown();
    let _ = shutdown_tx.send(());
    let _ = relay_task.await;
    let _ = projector_task.await;

    info!("Shutdown complete");
    Ok(())
}

fn setup_logging(debug: bool, log_level: &str) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let level = if debug { "debug" } else { log_level };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}
