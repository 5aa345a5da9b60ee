//! Integration tests for the database infrastructure
//!
//! These tests need a reachable PostgreSQL instance (see `DATABASE_URL`)
//! and are therefore ignored by default.

use common::database::{DatabaseConfig, health_check, init_pool, is_unique_violation};
use sqlx::Row;

/// Verify that PostgreSQL is accessible and can perform basic operations
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_database_integration() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1, "PostgreSQL simple query test failed");

    Ok(())
}

/// Verify that unique violations are classified as such
#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_unique_violation_detection() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    let mut conn = pool.acquire().await?;

    sqlx::query("CREATE TEMP TABLE uniq_names (name TEXT UNIQUE)")
        .execute(&mut *conn)
        .await?;
    sqlx::query("INSERT INTO uniq_names (name) VALUES ('x')")
        .execute(&mut *conn)
        .await?;

    let err = sqlx::query("INSERT INTO uniq_names (name) VALUES ('x')")
        .execute(&mut *conn)
        .await
        .expect_err("duplicate insert should fail");
    assert!(is_unique_violation(&err));

    Ok(())
}
