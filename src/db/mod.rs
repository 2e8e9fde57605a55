pub mod repository;

use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use crate::error::AppError;

/// Opens the local storage database and applies migrations.
///
/// One connection is enough: all state changes come from a single thread of
/// control, and an in-memory database only lives as long as its connection.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
