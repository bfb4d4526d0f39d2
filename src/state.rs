//! Application state shared across web handlers.

use sqlx::PgPool;

use crate::data::store::Store;
use crate::scraper::ScrapePipeline;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub store: Store,
    pub pipeline: ScrapePipeline,
}

impl AppState {
    pub fn new(db_pool: PgPool, store: Store, pipeline: ScrapePipeline) -> Self {
        Self {
            db_pool,
            store,
            pipeline,
        }
    }
}
