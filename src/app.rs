use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::ConnectOptions;
use sqlx::postgres::PgPoolOptions;
use std::str::FromStr;
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::data::store::Store;
use crate::embrapa::{EmbrapaClient, RetryPolicy};
use crate::scraper::ScrapePipeline;
use crate::scraper::parser::ParserRegistry;
use crate::state::AppState;
use crate::web::create_router;

/// Main application struct containing all initialized components.
pub struct App {
    config: Config,
    app_state: AppState,
}

impl App {
    /// Create a new App instance with all necessary components initialized.
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let connect_options = sqlx::postgres::PgConnectOptions::from_str(&config.database_url)
            .context("Failed to parse database URL")?
            .log_statements(tracing::log::LevelFilter::Debug)
            .log_slow_statements(tracing::log::LevelFilter::Warn, Duration::from_secs(1));

        let db_pool = PgPoolOptions::new()
            .min_connections(0)
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(4))
            .idle_timeout(Duration::from_secs(60 * 2))
            .connect_with(connect_options)
            .await
            .context("Failed to create database pool")?;

        info!(max_connections = 4, "database pool established");

        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("Database migrations completed");

        let base_url = Url::parse(&config.vitibrasil_base_url)
            .context("Failed to parse VITIBRASIL_BASE_URL")?;
        let client = EmbrapaClient::new(
            base_url,
            RetryPolicy {
                attempts: config.fetch_retries,
                ..RetryPolicy::default()
            },
            Duration::from_secs(config.fetch_timeout_secs),
        )
        .context("Failed to create VitiBrasil client")?;

        let store = Store::new(db_pool.clone());
        let pipeline = ScrapePipeline::new(
            Arc::new(client),
            Arc::new(ParserRegistry::with_defaults()),
            Arc::new(store.clone()),
        );

        let app_state = AppState::new(db_pool, store, pipeline);

        Ok(App { config, app_state })
    }

    /// Bind the listener and serve the API until shutdown.
    pub async fn serve(self) -> Result<(), anyhow::Error> {
        let router = create_router(self.app_state);

        let addr = format!("0.0.0.0:{}", self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        info!(addr = %addr, "web server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutdown signal received");
            })
            .await
            .context("Web server failed")
    }
}
