//! Database models and schema metadata.

pub mod store;

use serde::Serialize;

/// Canonical storage entities, one Postgres table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Production,
    Processing,
    Commercialization,
    Import,
    Export,
}

/// Table-level metadata driving the generic upsert/retrieve SQL.
///
/// All identifiers are static literals; they are interpolated into SQL
/// strings directly, values always go through bind parameters.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub table: &'static str,
    /// Column holding the row's dimension (product, variety or country).
    pub dimension_col: &'static str,
    /// Whether the table carries a monetary `value` column.
    pub has_value: bool,
    /// Whether the table carries a `classification` column. When present it
    /// participates in the natural key and is NOT NULL.
    pub has_classification: bool,
}

impl Entity {
    pub fn schema(self) -> EntitySchema {
        match self {
            Entity::Production => EntitySchema {
                table: "production",
                dimension_col: "product",
                has_value: false,
                has_classification: false,
            },
            Entity::Processing => EntitySchema {
                table: "processing",
                dimension_col: "variety",
                has_value: false,
                has_classification: true,
            },
            Entity::Commercialization => EntitySchema {
                table: "commercialization",
                dimension_col: "product",
                has_value: false,
                has_classification: false,
            },
            Entity::Import => EntitySchema {
                table: "import",
                dimension_col: "country",
                has_value: true,
                has_classification: true,
            },
            Entity::Export => EntitySchema {
                table: "export",
                dimension_col: "country",
                has_value: true,
                has_classification: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        self.schema().table
    }
}

/// A persisted row, shaped for the query API.
///
/// Dimension fields are optional so one struct serves all five entities;
/// exactly one of `product`/`variety`/`country` is set per row, and absent
/// fields are omitted from the JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct StoredRecord {
    pub id: i32,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_key_shape_per_entity() {
        assert!(!Entity::Production.schema().has_classification);
        assert!(!Entity::Commercialization.schema().has_classification);
        assert!(Entity::Processing.schema().has_classification);
        assert!(Entity::Import.schema().has_value);
        assert!(!Entity::Processing.schema().has_value);
    }

    #[test]
    fn test_absent_fields_are_omitted_from_json() {
        let record = StoredRecord {
            id: 1,
            year: 2023,
            product: Some("Vinho de mesa".into()),
            variety: None,
            country: None,
            classification: None,
            quantity: Some(1234),
            value: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["product"], "Vinho de mesa");
        assert!(json.get("country").is_none());
        assert!(json.get("value").is_none());
        assert_eq!(json["quantity"], 1234);
    }
}
