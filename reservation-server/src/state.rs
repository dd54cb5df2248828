//! Application state for reservation-server

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use crate::BoxError;
use crate::auth::{JwtConfig, JwtService};
use crate::config::Config;
use crate::db::memory::MemoryStore;
use crate::db::pg::PgStore;
use crate::reservation::ReservationService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtService>,
    pub reservations: ReservationService,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and wire the engine
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let store = Arc::new(PgStore::new(pool));
        Ok(Self::with_parts(
            config,
            ReservationService::new(
                store.clone(),
                store.clone(),
                store,
                config.default_page_size,
                config.max_page_size,
            ),
        ))
    }

    /// State over an in-memory store
    pub fn in_memory(config: &Config, store: Arc<MemoryStore>) -> Self {
        Self::with_parts(
            config,
            ReservationService::new(
                store.clone(),
                store.clone(),
                store,
                config.default_page_size,
                config.max_page_size,
            ),
        )
    }

    fn with_parts(config: &Config, reservations: ReservationService) -> Self {
        Self {
            config: Arc::new(config.clone()),
            jwt: Arc::new(JwtService::with_config(JwtConfig::from(config))),
            reservations,
        }
    }
}
