//! Error taxonomy for the scrape-normalize-upsert pipeline.

use crate::catalog::Page;

/// Errors raised along the scrape pipeline.
///
/// The orchestrator treats these differently: `Fetch`, `ParserNotRegistered`
/// and `NoTableFound` are local to one suboption and never abort siblings,
/// while `Sanitization` and `Storage` abort only the row that triggered them.
/// `UnknownPage` and `InvalidYears` are caller-input errors surfaced
/// immediately, with no retry.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to fetch {url} after {attempts} attempts")]
    Fetch {
        url: String,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },
    #[error("remote returned {status} for {url}")]
    FetchStatus { url: String, status: u16 },
    #[error("no parser registered for page {0:?}")]
    ParserNotRegistered(Page),
    #[error("data table not found in fetched document")]
    NoTableFound,
    #[error("cannot sanitize {field}: {raw:?} is not numeric")]
    Sanitization { field: &'static str, raw: String },
    #[error("storage failure")]
    Storage(#[from] sqlx::Error),
    #[error("unknown page: {0:?}")]
    UnknownPage(String),
    #[error("invalid years filter: {0}")]
    InvalidYears(String),
}
