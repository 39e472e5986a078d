use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use fittrack_backend::db;

/// A single-connection in-memory database: every query sees the same
/// schema, and the file disappears with the pool.
pub async fn setup_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");
    db::init_schema(&pool).await.expect("schema init should succeed");
    pool
}

pub fn init_env() {
    std::env::set_var("JWT_SECRET", "integration-test-secret");
}
