//! Tests for database initialization
//!
//! - Database file and parent directories are created on first run
//! - Reopening an existing database is idempotent
//! - The composers table enforces unique names

use catalog_common::db::init::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("catalog.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_composers_table_created() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("catalog.db")).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM composers")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_name_column_is_unique() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("catalog.db")).await.unwrap();

    let insert = |id: &'static str| {
        sqlx::query(
            "INSERT INTO composers (id, name, born, era, bio, created_at, updated_at)
             VALUES (?, 'Josquin des Prez', 1450, 'Renaissance', 'Franco-Flemish composer.', '', '')",
        )
        .bind(id)
    };

    insert("a").execute(&pool).await.unwrap();
    let err = insert("b").execute(&pool).await.unwrap_err();

    let db_err = err.as_database_error().expect("Expected a database error");
    assert!(db_err.is_unique_violation());
}

#[tokio::test]
async fn test_notable_works_defaults_to_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("catalog.db")).await.unwrap();

    sqlx::query(
        "INSERT INTO composers (id, name, born, era, bio, created_at, updated_at)
         VALUES ('x', 'Guillaume de Machaut', 1300, 'Medieval', 'French poet and composer.', '', '')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let works: String = sqlx::query_scalar("SELECT notable_works FROM composers WHERE id = 'x'")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(works, "[]");
}
