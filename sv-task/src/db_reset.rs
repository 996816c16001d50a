use sqlx::{Pool, Postgres};

use sv_common::log_info;

/// Drops every user table in the schema, then every user-defined enum type,
/// each with cascading removal of dependents. The enumeration runs server
/// side, so tables and types added after this was written are still covered.
/// Irreversible.
pub async fn drop_all(conn_pool: &Pool<Postgres>, schema: &str) -> anyhow::Result<()> {
    let drop_tables_sql = format!(
        "DO $$
        DECLARE
            r RECORD;
        BEGIN
            FOR r IN (SELECT tablename FROM pg_tables WHERE schemaname = '{}') LOOP
                EXECUTE 'DROP TABLE IF EXISTS ' || quote_ident(r.tablename) || ' CASCADE';
            END LOOP;
        END $$;",
        schema
    );
    sqlx::query(&drop_tables_sql).execute(conn_pool).await?;

    let drop_types_sql = format!(
        "DO $$
        DECLARE
            r RECORD;
        BEGIN
            FOR r IN (SELECT typname FROM pg_type
                WHERE typnamespace = '{}'::regnamespace
                AND typtype = 'e') LOOP
                EXECUTE 'DROP TYPE IF EXISTS ' || quote_ident(r.typname) || ' CASCADE';
            END LOOP;
        END $$;",
        schema
    );
    sqlx::query(&drop_types_sql).execute(conn_pool).await?;

    log_info!("successfully dropped all tables and types in schema {}", schema);
    Ok(())
}
