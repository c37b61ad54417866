//! Database bootstrap: create the database, the schema and the entity tables if they are missing.

use crate::error::AppError;
use crate::sql::{qualified_table, quoted};
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Contact columns shared by adopters and shelters.
const CONTACT_DDL: &str = r#"
    name TEXT NOT NULL,
    address_line1 TEXT,
    address_line2 TEXT,
    city TEXT,
    state TEXT,
    zip TEXT NOT NULL,
    phone_number TEXT,
    email TEXT,
    image_url TEXT"#;

/// DDL statements for `schema`, in dependency order.
pub fn table_ddl(schema: &str) -> Vec<String> {
    let shelters = qualified_table(schema, "shelters");
    let adopters = qualified_table(schema, "adopters");
    let pets = qualified_table(schema, "pets");
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,{},
                website TEXT,
                notes TEXT
            )
            "#,
            shelters, CONTACT_DDL
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,{},
                preferred_pet_type TEXT,
                adoption_status TEXT,
                notes TEXT,
                shelter_id BIGINT REFERENCES {} (id) ON DELETE SET NULL
            )
            "#,
            adopters, CONTACT_DDL, shelters
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                name TEXT NOT NULL,
                pet_type TEXT NOT NULL,
                breed TEXT,
                age INTEGER,
                notes TEXT,
                image_url TEXT,
                shelter_id BIGINT REFERENCES {} (id) ON DELETE SET NULL
            )
            "#,
            pets, shelters
        ),
        format!("CREATE INDEX IF NOT EXISTS adopters_name_zip_idx ON {} (name, zip)", adopters),
        format!(
            "CREATE INDEX IF NOT EXISTS adopters_pet_type_zip_idx ON {} (preferred_pet_type, zip)",
            adopters
        ),
        format!("CREATE INDEX IF NOT EXISTS adopters_shelter_idx ON {} (shelter_id)", adopters),
        format!("CREATE INDEX IF NOT EXISTS shelters_name_zip_idx ON {} (name, zip)", shelters),
        format!("CREATE INDEX IF NOT EXISTS pets_pet_type_idx ON {} (pet_type)", pets),
        format!("CREATE INDEX IF NOT EXISTS pets_shelter_idx ON {} (shelter_id)", pets),
    ]
}

/// Create schema and tables if not exists.
pub async fn ensure_tables(pool: &PgPool, schema: &str) -> Result<(), AppError> {
    for ddl in table_ddl(schema) {
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(schema = %schema, "tables ready");
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await.map_err(AppError::Db)?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await
        .map_err(AppError::Db)?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quoted(&db_name)))
            .execute(&mut conn)
            .await
            .map_err(AppError::Db)?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url.rfind('/').ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))? + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let (db_name, query) = match path_and_query.split_once('?') {
        Some((name, q)) => (name.trim(), Some(q)),
        None => (path_and_query.trim(), None),
    };
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Ok((admin_url, db_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_url_swaps_database_and_keeps_query() {
        let (admin, db) = parse_db_name_from_url("postgres://u:p@localhost:5432/adoption?sslmode=disable").unwrap();
        assert_eq!(admin, "postgres://u:p@localhost:5432/postgres?sslmode=disable");
        assert_eq!(db, "adoption");

        let (admin, db) = parse_db_name_from_url("postgres://localhost/pets").unwrap();
        assert_eq!(admin, "postgres://localhost/postgres");
        assert_eq!(db, "pets");
    }

    #[test]
    fn ddl_creates_shelters_before_referencing_tables() {
        let ddl = table_ddl("adoption");
        assert!(ddl[0].starts_with("CREATE SCHEMA IF NOT EXISTS \"adoption\""));
        let shelters = ddl.iter().position(|s| s.contains("\"adoption\".\"shelters\" (")).unwrap();
        let adopters = ddl.iter().position(|s| s.contains("\"adoption\".\"adopters\" (")).unwrap();
        assert!(shelters < adopters);
        assert!(ddl[adopters].contains("ON DELETE SET NULL"));
    }
}
