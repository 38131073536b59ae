use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use backoffice_common::Translator;
use backoffice_server::config::AppConfig;
use backoffice_server::state::AppState;
use backoffice_server::{build_router, database, seed};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db).await?;
    seed::seed_bootstrap_admin(&db, &config.auth)
        .await
        .context("Failed to seed bootstrap admin")?;

    let translator = Translator::bundled().context("Failed to load dictionaries")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let state = AppState {
        db,
        config,
        translator: Arc::new(translator),
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
