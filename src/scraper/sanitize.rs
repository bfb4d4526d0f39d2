//! Numeric sanitization for locale-formatted source values.
//!
//! VitiBrasil renders numbers with `.` as the thousands separator and a
//! single dash for "no data". A dash maps to NULL, never to zero. Anything
//! else that fails to parse after separator-stripping is an upstream format
//! regression and must surface as an error rather than be coerced to NULL,
//! which would mask real data as absent.

use crate::scraper::errors::ScrapeError;

/// Sentinel the source uses for missing data.
const NO_DATA: &str = "-";

/// Parse a raw numeric cell into `Some(n)` or `None` for the sentinel.
///
/// `field` names the canonical column for error reporting only.
pub fn sanitize_numeric(field: &'static str, raw: &str) -> Result<Option<i64>, ScrapeError> {
    let trimmed = raw.trim();
    if trimmed == NO_DATA {
        return Ok(None);
    }

    let stripped: String = trimmed.chars().filter(|c| *c != '.').collect();
    stripped
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ScrapeError::Sanitization {
            field,
            raw: raw.to_string(),
        })
}
