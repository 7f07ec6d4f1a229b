//! Application state

use common::Config;
use engine::{AttemptEngine, ProgressQueries, SeasonLifecycle};
use ingest::Ingester;
use sqlx::PgPool;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub lifecycle: SeasonLifecycle,
    pub attempts: AttemptEngine,
    pub progress: ProgressQueries,
    pub ingester: Ingester,
}

impl AppState {
    pub fn new(config: Config, pool: PgPool) -> Self {
        Self {
            lifecycle: SeasonLifecycle::new(pool.clone()),
            attempts: AttemptEngine::new(pool.clone()),
            progress: ProgressQueries::new(pool.clone()),
            ingester: Ingester::new(pool.clone()),
            config,
            pool,
        }
    }
}
