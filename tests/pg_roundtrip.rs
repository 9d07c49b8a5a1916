//! End-to-end checks against a live PostgreSQL instance. Each test is
//! skipped unless DATABASE_URL is set, so the default suite stays
//! self-contained.

use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tablegate::{build_model, CrudService, TableRegistry, TableSpec, TransformRegistry};

async fn pool() -> Option<sqlx::PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .ok()
}

#[tokio::test]
async fn numeric_and_money_columns_read_back() {
    let Some(pool) = pool().await else { return };
    sqlx::query(r#"DROP TABLE IF EXISTS "ReadbackChecks""#)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        r#"CREATE TABLE "ReadbackChecks" (
            check_id SERIAL PRIMARY KEY,
            price NUMERIC(10,2),
            fee MONEY,
            note TEXT
        )"#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        r#"INSERT INTO "ReadbackChecks" (price, fee, note) VALUES (19.99, 2.50, 'kept')"#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let registry = TableRegistry::new(vec![TableSpec::new("ReadbackChecks", "check_id", false)]);
    let model = build_model(&pool, &registry).await.unwrap();
    let table = model.table("ReadbackChecks").unwrap();
    let transforms = TransformRegistry::with_defaults();

    let rows = CrudService::list(&pool, table, &transforms).await.unwrap();
    assert_eq!(rows.len(), 1);
    // Numeric and money columns must carry their values (as text), not
    // collapse to null.
    assert_eq!(rows[0]["price"], json!("19.99"));
    assert!(rows[0]["fee"].is_string());
    assert_eq!(rows[0]["note"], json!("kept"));
    assert_eq!(rows[0]["check_id"], json!(1));

    let row = CrudService::get(&pool, table, &transforms, 1).await.unwrap();
    assert_eq!(row["price"], json!("19.99"));

    sqlx::query(r#"DROP TABLE "ReadbackChecks""#)
        .execute(&pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn introspection_scopes_to_the_current_schema() {
    let Some(pool) = pool().await else { return };
    sqlx::query(r#"DROP TABLE IF EXISTS "ScopedItems""#)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(r#"CREATE TABLE "ScopedItems" (item_id SERIAL PRIMARY KEY, label TEXT)"#)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("CREATE SCHEMA IF NOT EXISTS side_room")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(r#"DROP TABLE IF EXISTS side_room."ScopedItems""#)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(r#"CREATE TABLE side_room."ScopedItems" (other_id SERIAL PRIMARY KEY, stray TEXT)"#)
        .execute(&pool)
        .await
        .unwrap();

    let registry = TableRegistry::new(vec![TableSpec::new("ScopedItems", "item_id", false)]);
    let model = build_model(&pool, &registry).await.unwrap();
    let table = model.table("ScopedItems").unwrap();
    assert!(table.has_column("label"));
    assert!(!table.has_column("stray"));
    assert!(!table.has_column("other_id"));

    sqlx::query(r#"DROP TABLE side_room."ScopedItems""#)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(r#"DROP TABLE "ScopedItems""#)
        .execute(&pool)
        .await
        .unwrap();
}
