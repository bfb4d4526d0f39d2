//! Source-header → canonical-field translation.
//!
//! The site's column headers are Portuguese, inconsistently cased and
//! occasionally padded. Headers are normalized (trim + lowercase) before
//! lookup; anything not in the mapping is decorative and dropped from the
//! canonical row.

use indexmap::IndexMap;

use crate::scraper::parser::RawRow;

/// Normalized source header → canonical field name.
///
/// Keys are pre-normalized (lowercase, trimmed); the accented forms match
/// the site's exact rendering.
const COLUMN_MAP: &[(&str, &str)] = &[
    ("produto", "product"),
    ("quantidade (l.)", "quantity"),
    ("quantidade (kg)", "quantity"),
    ("valor", "value"),
    ("valor (us$)", "value"),
    ("país", "country"),
    ("países", "country"),
    ("cultivar", "variety"),
];

/// Translation table from source column headers to canonical field names.
#[derive(Debug, Clone)]
pub struct ColumnTranslator {
    mapping: IndexMap<String, &'static str>,
}

impl ColumnTranslator {
    pub fn new() -> Self {
        Self {
            mapping: COLUMN_MAP
                .iter()
                .map(|(src, dst)| (src.to_string(), *dst))
                .collect(),
        }
    }

    /// Translate one row, keeping only mapped columns.
    ///
    /// Idempotent: canonical names are not mapping keys, so re-translating an
    /// already-canonical row drops everything; callers translate raw rows
    /// exactly once, straight off the parser.
    pub fn translate(&self, row: &RawRow) -> IndexMap<&'static str, String> {
        row.iter()
            .filter_map(|(header, value)| {
                let normalized = header.trim().to_lowercase();
                self.mapping
                    .get(&normalized)
                    .map(|canonical| (*canonical, value.clone()))
            })
            .collect()
    }
}

impl Default for ColumnTranslator {
    fn default() -> Self {
        Self::new()
    }
}
