//! Till server - checkout and inventory backend over PostgreSQL.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use till_api::AppState;
use till_db::{PgConfig, PgStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Till - checkout and inventory-consistency backend
#[derive(Parser)]
#[command(name = "till-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Address to bind the HTTP listener to
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    bind: String,

    /// Maximum number of pooled database connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    db_max_connections: u32,

    /// Skip running embedded migrations at startup
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let store = PgStore::connect_with(
        &cli.database_url,
        PgConfig {
            max_connections: cli.db_max_connections,
            ..PgConfig::default()
        },
    )
    .await?;

    if !cli.no_migrate {
        store.migrate().await?;
        info!("database migrations applied");
    }

    let app = till_api::router(AppState::new(Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!(addr = %cli.bind, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
