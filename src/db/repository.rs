//! Key/value access to the `local_storage` table.

use chrono::Utc;
use sqlx::SqlitePool;

pub async fn get_item(db: &SqlitePool, key: &str) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await
}

pub async fn set_item(db: &SqlitePool, key: &str, value: &str) -> Result<(), sqlx::Error> {
    set_items(db, &[(key, value)]).await
}

/// Writes every pair in one transaction.
pub async fn set_items(db: &SqlitePool, items: &[(&str, &str)]) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let mut tx = db.begin().await?;

    for &(key, value) in items {
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

pub async fn remove_item(db: &SqlitePool, key: &str) -> Result<bool, sqlx::Error> {
    Ok(remove_items(db, &[key]).await? > 0)
}

/// Returns how many of the keys were present.
pub async fn remove_items(db: &SqlitePool, keys: &[&str]) -> Result<u64, sqlx::Error> {
    let mut tx = db.begin().await?;
    let mut removed = 0;

    for &key in keys {
        removed += sqlx::query("DELETE FROM local_storage WHERE key = ?")
            .bind(key)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;
    Ok(removed)
}
