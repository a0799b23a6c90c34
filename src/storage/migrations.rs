//! # Database Migration Management
//!
//! Each tenant database carries exactly two tables, so the schema is
//! embedded in the binary and applied idempotently when a tenant pool is
//! created. Applied versions are tracked in a `schema_migrations` table so
//! future additions run exactly once per tenant database.

use crate::errors::{GrapevineError, Result};
use crate::storage::DbPool;
use sqlx::Row;
use tracing::info;

/// Embedded schema migrations, ordered by version.
const MIGRATIONS: &[(i64, &str, &str)] = &[
    (
        1,
        "create config table",
        r#"
        CREATE TABLE IF NOT EXISTS config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        2,
        "create api_keys table",
        r#"
        CREATE TABLE IF NOT EXISTS api_keys (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            prefix TEXT NOT NULL,
            created_by TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            last_used_at TIMESTAMP
        )
        "#,
    ),
];

/// Run all pending migrations against a tenant database.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    create_migration_table(pool).await?;

    let applied = applied_versions(pool).await?;
    let mut migrations_run = 0;

    for (version, description, sql) in MIGRATIONS {
        if applied.contains(version) {
            continue;
        }

        sqlx::query(sql).execute(pool).await.map_err(|e| GrapevineError::Database {
            source: e,
            context: format!("Migration {} ({}) failed", version, description),
        })?;

        sqlx::query(
            "INSERT INTO schema_migrations (version, description, installed_on)
             VALUES ($1, $2, CURRENT_TIMESTAMP)",
        )
        .bind(version)
        .bind(description)
        .execute(pool)
        .await
        .map_err(|e| GrapevineError::Database {
            source: e,
            context: format!("Failed to record migration {}", version),
        })?;

        migrations_run += 1;
    }

    if migrations_run > 0 {
        info!(migrations_run, "Applied database migrations");
    }

    Ok(())
}

async fn create_migration_table(pool: &DbPool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            installed_on TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| GrapevineError::Database {
        source: e,
        context: "Failed to create schema_migrations table".to_string(),
    })?;

    Ok(())
}

async fn applied_versions(pool: &DbPool) -> Result<Vec<i64>> {
    let rows = sqlx::query("SELECT version FROM schema_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .map_err(|e| GrapevineError::Database {
            source: e,
            context: "Failed to read applied migrations".to_string(),
        })?;

    Ok(rows.iter().map(|row| row.get::<i64, _>("version")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> DbPool {
        sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite://:memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_run_migrations_creates_tables() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();

        sqlx::query("SELECT key, value, created_at, updated_at FROM config")
            .fetch_all(&pool)
            .await
            .unwrap();
        sqlx::query("SELECT id, name, prefix, created_by, created_at, last_used_at FROM api_keys")
            .fetch_all(&pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_migrations_is_idempotent() {
        let pool = memory_pool().await;
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let applied = applied_versions(&pool).await.unwrap();
        assert_eq!(applied, vec![1, 2]);
    }
}
