//! Database module
//!
//! Embedded SurrealDB (RocksDB on disk, in-memory for tests). Schema is
//! mostly schemaless; the unique indexes below are load-bearing, they are
//! what makes catalog syncs and registration safe under concurrency.

pub mod models;
pub mod repository;
pub mod seed;

use shared::{AppError, AppResult};
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "market";
const DATABASE: &str = "market";

/// Open the on-disk database and apply schema definitions
pub async fn connect(path: &Path) -> AppResult<Surreal<Db>> {
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
    init(&db).await?;
    Ok(db)
}

/// In-memory database with the same schema, used by tests and tooling
pub async fn connect_memory() -> AppResult<Surreal<Db>> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;
    init(&db).await?;
    Ok(db)
}

async fn init(db: &Surreal<Db>) -> AppResult<()> {
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;
    define_schema(db).await
}

async fn define_schema(db: &Surreal<Db>) -> AppResult<()> {
    db.query(
        "
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email_unique ON TABLE user FIELDS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS customer SCHEMALESS;
        DEFINE TABLE IF NOT EXISTS driver SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS store SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS store_name_unique ON TABLE store FIELDS name UNIQUE;

        DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS product_identity_unique ON TABLE product FIELDS name, brand UNIQUE;

        DEFINE TABLE IF NOT EXISTS store_product SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS offering_identity_unique ON TABLE store_product FIELDS store, product UNIQUE;
        DEFINE FIELD IF NOT EXISTS price ON TABLE store_product TYPE number ASSERT $value >= 0;

        DEFINE TABLE IF NOT EXISTS orders SCHEMALESS;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

    tracing::debug!("Database schema defined");
    Ok(())
}
