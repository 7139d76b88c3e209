//! Process startup wiring shared by the binaries.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::{AppConfig, DatabaseBackend},
    repository::{InMemoryTeamRepository, PgTeamRepository, TeamRepository},
    source::{ApiFootballClient, RetryConfig, RetryingSource, TeamSource},
};

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fantasy_sync=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connects the configured store and makes sure the `teams` table exists.
pub async fn connect_repository(config: &AppConfig) -> Result<Arc<dyn TeamRepository>> {
    let repository: Arc<dyn TeamRepository> = match config.database_backend {
        DatabaseBackend::Postgres => {
            info!("database backend: postgres");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(&config.database_url)
                .await
                .context("failed to connect to PostgreSQL")?;
            Arc::new(PgTeamRepository::new(pool))
        }
        DatabaseBackend::Memory => {
            info!("database backend: in-memory");
            Arc::new(InMemoryTeamRepository::new())
        }
    };

    repository
        .init()
        .await
        .context("failed to initialize team schema")?;

    Ok(repository)
}

pub fn build_source(config: &AppConfig) -> Result<Arc<dyn TeamSource>> {
    let client = ApiFootballClient::new(&config.api_football)
        .context("failed to build API-Football client")?;
    let retry = RetryConfig::with_retries(config.fetch_retries);
    Ok(Arc::new(RetryingSource::new(client, retry)))
}
