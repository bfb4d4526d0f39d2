//! Read-side handlers: stored rows per entity, filtered by year.

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::data::{Entity, StoredRecord};
use crate::scraper::errors::ScrapeError;
use crate::state::AppState;
use crate::web::error::ApiError;

/// Parse a comma-separated year filter.
///
/// Empty or all-whitespace input means "no filter" and maps to `None`; any
/// non-integer token is a caller error.
pub fn parse_years(raw: &str) -> Result<Option<Vec<i32>>, ScrapeError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    raw.split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i32>()
                .map_err(|_| ScrapeError::InvalidYears(format!("not an integer: {token:?}")))
        })
        .collect::<Result<Vec<i32>, _>>()
        .map(Some)
}

#[derive(Debug, Deserialize)]
pub struct YearsParams {
    #[serde(default)]
    pub years: Option<String>,
}

async fn list_entity(
    state: &AppState,
    entity: Entity,
    params: &YearsParams,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    let years = parse_years(params.years.as_deref().unwrap_or_default())?;
    let rows = state.store.retrieve(entity, years.as_deref()).await?;
    Ok(Json(rows))
}

pub(super) async fn production(
    State(state): State<AppState>,
    Query(params): Query<YearsParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    list_entity(&state, Entity::Production, &params).await
}

pub(super) async fn processing(
    State(state): State<AppState>,
    Query(params): Query<YearsParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    list_entity(&state, Entity::Processing, &params).await
}

pub(super) async fn commercialization(
    State(state): State<AppState>,
    Query(params): Query<YearsParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    list_entity(&state, Entity::Commercialization, &params).await
}

pub(super) async fn imports(
    State(state): State<AppState>,
    Query(params): Query<YearsParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    list_entity(&state, Entity::Import, &params).await
}

pub(super) async fn exports(
    State(state): State<AppState>,
    Query(params): Query<YearsParams>,
) -> Result<Json<Vec<StoredRecord>>, ApiError> {
    list_entity(&state, Entity::Export, &params).await
}
