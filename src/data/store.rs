//! Idempotent persistence for scraped rows.
//!
//! The sole write path for the five entity tables. Each row is upserted with
//! a single `INSERT ... ON CONFLICT (natural key) DO UPDATE` statement, so
//! the database's unique constraint is the final arbiter against concurrent
//! duplicate inserts and each row commits independently; a run abandoned
//! between suboptions leaves no partial state behind.

use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::debug;

use crate::data::{Entity, EntitySchema, StoredRecord};
use crate::scraper::errors::ScrapeError;
use crate::scraper::sanitize::sanitize_numeric;

/// A normalized row as produced by the pipeline, numeric fields still in
/// their raw source form.
///
/// `quantity`/`value` are `None` when the source table had no such column
/// (not when the cell was the "no data" dash, which arrives as the raw string `"-"`).
/// Absent fields are left untouched when the row updates an existing record.
#[derive(Debug, Clone)]
pub struct ScrapedRecord {
    pub year: i32,
    /// Dimension value: product, variety or country, per the target entity.
    pub dimension: String,
    pub classification: Option<String>,
    pub quantity: Option<String>,
    pub value: Option<String>,
}

/// Upsert/retrieve layer over the entity tables, driven by [`EntitySchema`]
/// metadata rather than per-entity SQL.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Sanitize and persist one row, updating in place when the natural key
    /// already exists.
    ///
    /// Calling this twice with identical input leaves exactly one row with
    /// those values. Fields absent from `record` are preserved on update.
    pub async fn upsert(
        &self,
        entity: Entity,
        record: &ScrapedRecord,
    ) -> Result<StoredRecord, ScrapeError> {
        let schema = entity.schema();

        let quantity = match &record.quantity {
            Some(raw) => Some(sanitize_numeric("quantity", raw)?),
            None => None,
        };
        // A stray value column on a value-less entity can't be stored, so it
        // must not fail the row either; sanitize only what the table holds.
        let value = match &record.value {
            Some(raw) if schema.has_value => Some(sanitize_numeric("value", raw)?),
            _ => None,
        };

        let mut insert_cols: Vec<&str> = vec!["year", schema.dimension_col];
        if schema.has_classification {
            insert_cols.push("classification");
        }
        if quantity.is_some() {
            insert_cols.push("quantity");
        }
        if value.is_some() {
            insert_cols.push("value");
        }

        let placeholders: Vec<String> = (1..=insert_cols.len()).map(|i| format!("${i}")).collect();
        // classification participates in the natural key where present
        let key_cols = if schema.has_classification {
            format!("year, {}, classification", schema.dimension_col)
        } else {
            format!("year, {}", schema.dimension_col)
        };

        let updates: Vec<String> = insert_cols
            .iter()
            .filter(|c| **c == "quantity" || **c == "value")
            .map(|c| format!("{c} = EXCLUDED.{c}"))
            .collect();
        let set_clause = if updates.is_empty() {
            // No-op assignment so a conflicting row is still RETURNING'd.
            "year = EXCLUDED.year".to_string()
        } else {
            updates.join(", ")
        };

        let sql = format!(
            "INSERT INTO {table} ({cols}) VALUES ({vals}) \
             ON CONFLICT ({key}) DO UPDATE SET {set} \
             RETURNING *",
            table = schema.table,
            cols = insert_cols.join(", "),
            vals = placeholders.join(", "),
            key = key_cols,
            set = set_clause,
        );

        let mut query = sqlx::query(&sql)
            .bind(record.year)
            .bind(&record.dimension);
        if schema.has_classification {
            query = query.bind(record.classification.clone().unwrap_or_default());
        }
        if let Some(quantity) = quantity {
            query = query.bind(quantity);
        }
        if let Some(value) = value {
            query = query.bind(value);
        }

        let row = query.fetch_one(&self.pool).await?;
        debug!(
            entity = entity.as_str(),
            year = record.year,
            dimension = record.dimension.as_str(),
            "row upserted"
        );
        Ok(map_row(&schema, &row)?)
    }

    /// Fetch all rows of an entity, optionally filtered to a set of years.
    pub async fn retrieve(
        &self,
        entity: Entity,
        years: Option<&[i32]>,
    ) -> Result<Vec<StoredRecord>, ScrapeError> {
        let schema = entity.schema();

        let mut sql = format!("SELECT * FROM {}", schema.table);
        if years.is_some() {
            sql.push_str(" WHERE year = ANY($1)");
        }
        sql.push_str(&format!(" ORDER BY year, {}", schema.dimension_col));

        let mut query = sqlx::query(&sql);
        if let Some(years) = years {
            query = query.bind(years);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| map_row(&schema, row).map_err(ScrapeError::from))
            .collect()
    }
}

#[async_trait::async_trait]
impl crate::scraper::RecordSink for Store {
    async fn store(
        &self,
        entity: Entity,
        record: &ScrapedRecord,
    ) -> Result<StoredRecord, ScrapeError> {
        self.upsert(entity, record).await
    }
}

/// Map a raw Postgres row into a [`StoredRecord`] using the entity's schema.
fn map_row(schema: &EntitySchema, row: &PgRow) -> Result<StoredRecord, sqlx::Error> {
    let dimension: String = row.try_get(schema.dimension_col)?;
    let mut record = StoredRecord {
        id: row.try_get("id")?,
        year: row.try_get("year")?,
        product: None,
        variety: None,
        country: None,
        classification: None,
        quantity: row.try_get("quantity")?,
        value: None,
    };
    match schema.dimension_col {
        "variety" => record.variety = Some(dimension),
        "country" => record.country = Some(dimension),
        _ => record.product = Some(dimension),
    }
    if schema.has_classification {
        record.classification = Some(row.try_get("classification")?);
    }
    if schema.has_value {
        record.value = row.try_get("value")?;
    }
    Ok(record)
}
