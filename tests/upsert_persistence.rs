//! Live-database tests for the upsert layer.
//!
//! Each test gets its own provisioned database with the crate migrations
//! applied, so assertions run against the real table constraints.

use sqlx::PgPool;
use vitidata::data::Entity;
use vitidata::data::store::{ScrapedRecord, Store};

/// Builds a production row as it leaves normalization: raw string numbers
/// with thousands separators, no classification.
fn production_record(year: i32, product: &str, quantity: &str) -> ScrapedRecord {
    ScrapedRecord {
        year,
        dimension: product.to_string(),
        classification: None,
        quantity: Some(quantity.to_string()),
        value: None,
    }
}

/// Builds an import row; `quantity`/`value` are `None` when the scraped
/// table did not carry that column at all.
fn import_record(
    year: i32,
    country: &str,
    classification: &str,
    quantity: Option<&str>,
    value: Option<&str>,
) -> ScrapedRecord {
    ScrapedRecord {
        year,
        dimension: country.to_string(),
        classification: Some(classification.to_string()),
        quantity: quantity.map(str::to_string),
        value: value.map(str::to_string),
    }
}

#[sqlx::test]
async fn test_duplicate_production_upsert_keeps_one_row(pool: PgPool) {
    let store = Store::new(pool);
    let record = production_record(2023, "VINHO DE MESA", "169.762.429");

    store
        .upsert(Entity::Production, &record)
        .await
        .expect("first upsert should succeed");
    store
        .upsert(Entity::Production, &record)
        .await
        .expect("repeating an identical upsert should succeed");

    let rows = store
        .retrieve(Entity::Production, Some(&[2023]))
        .await
        .expect("retrieve should succeed");
    assert_eq!(
        rows.len(),
        1,
        "expected exactly 1 production row after duplicate upsert, got {}",
        rows.len()
    );
    assert_eq!(rows[0].product.as_deref(), Some("VINHO DE MESA"));
    assert_eq!(
        rows[0].quantity,
        Some(169_762_429),
        "quantity should be stored with thousands separators stripped"
    );
}

#[sqlx::test]
async fn test_duplicate_import_upsert_keeps_one_row(pool: PgPool) {
    let store = Store::new(pool);
    let record = import_record(2023, "Argentina", "Vinhos de mesa", Some("5.000"), Some("12.345"));

    store
        .upsert(Entity::Import, &record)
        .await
        .expect("first upsert should succeed");
    store
        .upsert(Entity::Import, &record)
        .await
        .expect("repeating an identical upsert should succeed");

    let rows = store
        .retrieve(Entity::Import, Some(&[2023]))
        .await
        .expect("retrieve should succeed");
    assert_eq!(
        rows.len(),
        1,
        "expected exactly 1 import row after duplicate upsert, got {}",
        rows.len()
    );
    assert_eq!(rows[0].country.as_deref(), Some("Argentina"));
    assert_eq!(rows[0].classification.as_deref(), Some("Vinhos de mesa"));
    assert_eq!(rows[0].quantity, Some(5_000));
    assert_eq!(rows[0].value, Some(12_345));
}

#[sqlx::test]
async fn test_quantity_only_update_preserves_stored_value(pool: PgPool) {
    let store = Store::new(pool);

    let full = import_record(2023, "Chile", "Espumantes", Some("5.000"), Some("12.345"));
    store
        .upsert(Entity::Import, &full)
        .await
        .expect("seeding upsert should succeed");

    // Same natural key, but this scrape only carried a quantity column.
    let partial = import_record(2023, "Chile", "Espumantes", Some("6.000"), None);
    store
        .upsert(Entity::Import, &partial)
        .await
        .expect("partial upsert should succeed");

    let rows = store
        .retrieve(Entity::Import, Some(&[2023]))
        .await
        .expect("retrieve should succeed");
    assert_eq!(rows.len(), 1, "partial upsert must update in place, not insert");
    assert_eq!(
        rows[0].quantity,
        Some(6_000),
        "quantity present in the update should overwrite"
    );
    assert_eq!(
        rows[0].value,
        Some(12_345),
        "value absent from the update should keep its stored content"
    );
}

#[sqlx::test]
async fn test_dash_quantity_overwrites_with_null(pool: PgPool) {
    let store = Store::new(pool);

    store
        .upsert(Entity::Production, &production_record(2023, "SUCO", "1.000"))
        .await
        .expect("seeding upsert should succeed");

    // A present "-" cell means "no data" and must null the column, unlike an
    // absent field which leaves it untouched.
    store
        .upsert(Entity::Production, &production_record(2023, "SUCO", "-"))
        .await
        .expect("dash upsert should succeed");

    let rows = store
        .retrieve(Entity::Production, Some(&[2023]))
        .await
        .expect("retrieve should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].quantity, None,
        "a dash cell should overwrite the stored quantity with NULL"
    );
}

#[sqlx::test]
async fn test_stray_value_field_on_value_less_entity_is_ignored(pool: PgPool) {
    let store = Store::new(pool);

    // The production table has no value column; a leftover value field on the
    // record must not fail the row, even when unparseable.
    let mut record = production_record(2023, "DERIVADOS", "2.500");
    record.value = Some("n/d".to_string());

    store
        .upsert(Entity::Production, &record)
        .await
        .expect("row should persist despite a stray value field");

    let rows = store
        .retrieve(Entity::Production, Some(&[2023]))
        .await
        .expect("retrieve should succeed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, Some(2_500));
    assert!(rows[0].value.is_none(), "production rows never carry a value");
}
