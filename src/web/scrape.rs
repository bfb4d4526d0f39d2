//! Scrape-trigger handlers.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use serde::Deserialize;
use tracing::info;

use crate::catalog::Page;
use crate::scraper::ScrapeReport;
use crate::state::AppState;
use crate::web::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub year: i32,
}

/// Scrape one page for one year and report per-suboption outcomes.
pub(super) async fn scrape_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Query(params): Query<ScrapeParams>,
) -> Result<Json<ScrapeReport>, ApiError> {
    let page: Page = page.parse()?;
    info!(page = %page, year = params.year, "scrape requested");
    Ok(Json(state.pipeline.run_page(page, params.year).await))
}

/// Scrape every page in the catalog for one year.
pub(super) async fn scrape_all(
    State(state): State<AppState>,
    Query(params): Query<ScrapeParams>,
) -> Result<Json<Vec<ScrapeReport>>, ApiError> {
    info!(year = params.year, "full scrape requested");
    Ok(Json(state.pipeline.run_all(params.year).await))
}
