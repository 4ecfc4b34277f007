//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    salonix_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("tenant"), "missing tenant table");
    assert!(info_str.contains("customer"), "missing customer table");
    assert!(info_str.contains("day_closing"), "missing day_closing table");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    salonix_db::run_migrations(&db).await.unwrap();
    salonix_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn unique_index_prevents_duplicate_subdomains() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    salonix_db::run_migrations(&db).await.unwrap();

    db.query("CREATE tenant SET name = 'A', subdomain = 'glamour'")
        .await
        .unwrap()
        .check()
        .unwrap();

    let result = db
        .query("CREATE tenant SET name = 'B', subdomain = 'glamour'")
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "duplicate subdomain should be rejected");
}
