use chrono::{DateTime, Utc};
use sqlx::PgPool;

/// Every table except `_sqlx_migrations` carries `created_at` and `updated_at` as timestamptz.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(tables.len(), 5);

    for (table,) in &tables {
        for col in ["created_at", "updated_at"] {
            let result: Option<(String,)> = sqlx::query_as(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = $1
                   AND column_name = $2",
            )
            .bind(table)
            .bind(col)
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// Every table with `updated_at` has a BEFORE UPDATE trigger maintaining it.
#[sqlx::test(migrations = "./migrations")]
async fn test_updated_at_triggers_exist(pool: PgPool) {
    let missing: Vec<(String,)> = sqlx::query_as(
        "SELECT c.table_name
         FROM information_schema.columns c
         WHERE c.table_schema = 'public'
           AND c.column_name = 'updated_at'
           AND NOT EXISTS (
               SELECT 1 FROM information_schema.triggers t
               WHERE t.event_object_table = c.table_name
                 AND t.action_timing = 'BEFORE'
                 AND t.event_manipulation = 'UPDATE'
                 AND t.action_statement LIKE '%set_updated_at%'
           )",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(missing.is_empty(), "Tables without an updated_at trigger: {missing:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_bumps_updated_at(pool: PgPool) {
    let (id, before): (i64, DateTime<Utc>) = sqlx::query_as(
        "INSERT INTO users (name, email, password_hash, updated_at)
         VALUES ('Jane', 'jane@example.com', 'hash', NOW() - INTERVAL '1 hour')
         RETURNING id, updated_at",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let (after,): (DateTime<Utc>,) =
        sqlx::query_as("UPDATE users SET name = 'Janet' WHERE id = $1 RETURNING updated_at")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();

    assert!(after > before);
}

/// TEXT only; no character varying columns.
#[sqlx::test(migrations = "./migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "VARCHAR columns found: {rows:?}");
}
