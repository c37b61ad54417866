//! Builds parameterized SELECT, INSERT, upsert and DELETE statements from a static table definition.

use crate::sql::PgBindValue;

/// Primary key column shared by every table.
pub const ID_COLUMN: &str = "id";

/// One non-key column and the PostgreSQL type its placeholders are cast to.
#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub pg_type: &'static str,
}

/// Table name plus its non-key columns in select order.
#[derive(Clone, Copy, Debug)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    fn pg_type(&self, column: &str) -> Option<&'static str> {
        self.columns.iter().find(|c| c.name == column).map(|c| c.pg_type)
    }
}

/// Quote identifier for PostgreSQL (safe: only from static table definitions and validated config).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }

    /// Push a value and return its placeholder, cast to the column type when known.
    fn placeholder(&mut self, table: &TableDef, column: &str, v: PgBindValue) -> String {
        let n = self.push_param(v);
        table
            .pg_type(column)
            .map(|t| format!("${}::{}", n, t))
            .unwrap_or_else(|| format!("${}", n))
    }
}

/// `id` followed by every column of the table.
fn select_column_list(table: &TableDef) -> String {
    std::iter::once(ID_COLUMN)
        .chain(table.columns.iter().map(|c| c.name))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT every row ordered by id.
pub fn select_all(schema: &str, table: &TableDef) -> QueryBuf {
    select_where(schema, table, Vec::new())
}

/// SELECT by primary key.
pub fn select_by_id(schema: &str, table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(table),
        qualified_table(schema, table.name),
        quoted(ID_COLUMN),
        n
    );
    q
}

/// SELECT with exact-match filters ANDed together, ORDER BY id. Params bound in filter order.
pub fn select_where(schema: &str, table: &TableDef, filters: Vec<(&str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    for (col, val) in filters {
        let ph = q.placeholder(table, col, val);
        where_parts.push(format!("{} = {}", quoted(col), ph));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list(table),
        qualified_table(schema, table.name),
        where_clause,
        quoted(ID_COLUMN)
    );
    q
}

/// INSERT without id; the identity column assigns it. Returns the stored row.
pub fn insert(schema: &str, table: &TableDef, values: Vec<(&str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (col, val) in values {
        placeholders.push(q.placeholder(table, col, val));
        cols.push(quoted(col));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        qualified_table(schema, table.name),
        cols.join(", "),
        placeholders.join(", "),
        select_column_list(table)
    );
    q
}

/// INSERT with an explicit id, replacing every column of an existing row with that id.
pub fn upsert(schema: &str, table: &TableDef, id: i64, values: Vec<(&str, PgBindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let id_param = q.push_param(PgBindValue::I64(id));
    let mut cols = vec![quoted(ID_COLUMN)];
    let mut placeholders = vec![format!("${}::bigint", id_param)];
    let mut sets = Vec::new();
    for (col, val) in values {
        placeholders.push(q.placeholder(table, col, val));
        cols.push(quoted(col));
        sets.push(format!("{} = EXCLUDED.{}", quoted(col), quoted(col)));
    }
    let conflict = if sets.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", sets.join(", "))
    };
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {} RETURNING {}",
        qualified_table(schema, table.name),
        cols.join(", "),
        placeholders.join(", "),
        quoted(ID_COLUMN),
        conflict,
        select_column_list(table)
    );
    q
}

/// Block concurrent inserts into the table until the transaction ends. Taken before writing an
/// explicit id so that reading and advancing the identity sequence cannot interleave with `nextval`.
pub fn lock_for_explicit_id(schema: &str, table: &TableDef) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "LOCK TABLE {} IN SHARE ROW EXCLUSIVE MODE",
        qualified_table(schema, table.name)
    );
    q
}

/// Advance the identity sequence to at least `id`. Never moves it backwards.
pub fn advance_id_sequence(schema: &str, table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let t = q.push_param(PgBindValue::String(qualified_table(schema, table.name)));
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "SELECT setval(s.seq, GREATEST(COALESCE(pg_sequence_last_value(s.seq::regclass), 0), ${}::bigint)) \
         FROM (SELECT pg_get_serial_sequence(${}, '{}') AS seq) s",
        n, t, ID_COLUMN
    );
    q
}

/// Clear a reference column on every row pointing at `target_id`.
pub fn clear_reference(schema: &str, table: &TableDef, column: &str, target_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(target_id));
    q.sql = format!(
        "UPDATE {} SET {} = NULL WHERE {} = ${}",
        qualified_table(schema, table.name),
        quoted(column),
        quoted(column),
        n
    );
    q
}

/// DELETE by id. Returns the deleted id so callers can tell whether a row existed.
pub fn delete_by_id(schema: &str, table: &TableDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::I64(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        qualified_table(schema, table.name),
        quoted(ID_COLUMN),
        n,
        quoted(ID_COLUMN)
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEOPLE: TableDef = TableDef {
        name: "people",
        columns: &[
            ColumnDef { name: "name", pg_type: "text" },
            ColumnDef { name: "age", pg_type: "integer" },
        ],
    };

    #[test]
    fn select_where_casts_and_orders() {
        let q = select_where("app", &PEOPLE, vec![("name", "Ann".into()), ("age", 3_i64.into())]);
        assert_eq!(
            q.sql,
            r#"SELECT "id", "name", "age" FROM "app"."people" WHERE "name" = $1::text AND "age" = $2::integer ORDER BY "id""#
        );
        assert_eq!(q.params.len(), 2);
    }

    #[test]
    fn select_all_has_no_where() {
        let q = select_all("app", &PEOPLE);
        assert_eq!(q.sql, r#"SELECT "id", "name", "age" FROM "app"."people" ORDER BY "id""#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_returns_row() {
        let q = insert("app", &PEOPLE, vec![("name", "Ann".into()), ("age", PgBindValue::Null)]);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "app"."people" ("name", "age") VALUES ($1::text, $2::integer) RETURNING "id", "name", "age""#
        );
    }

    #[test]
    fn upsert_replaces_every_column() {
        let q = upsert("app", &PEOPLE, 7, vec![("name", "Ann".into()), ("age", 4_i64.into())]);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "app"."people" ("id", "name", "age") VALUES ($1::bigint, $2::text, $3::integer) ON CONFLICT ("id") DO UPDATE SET "name" = EXCLUDED."name", "age" = EXCLUDED."age" RETURNING "id", "name", "age""#
        );
        assert_eq!(q.params[0], PgBindValue::I64(7));
    }

    #[test]
    fn explicit_id_locks_then_only_advances_the_sequence() {
        let lock = lock_for_explicit_id("app", &PEOPLE);
        assert_eq!(lock.sql, r#"LOCK TABLE "app"."people" IN SHARE ROW EXCLUSIVE MODE"#);

        let q = advance_id_sequence("app", &PEOPLE, 12);
        assert_eq!(
            q.sql,
            r#"SELECT setval(s.seq, GREATEST(COALESCE(pg_sequence_last_value(s.seq::regclass), 0), $2::bigint)) FROM (SELECT pg_get_serial_sequence($1, 'id') AS seq) s"#
        );
        assert_eq!(q.params, vec![PgBindValue::String(r#""app"."people""#.into()), PgBindValue::I64(12)]);
    }

    #[test]
    fn clear_reference_nulls_matching_rows() {
        let q = clear_reference("app", &PEOPLE, "shelter_id", 3);
        assert_eq!(q.sql, r#"UPDATE "app"."people" SET "shelter_id" = NULL WHERE "shelter_id" = $1"#);
        assert_eq!(q.params, vec![PgBindValue::I64(3)]);
    }

    #[test]
    fn delete_returns_id() {
        let q = delete_by_id("app", &PEOPLE, 2);
        assert_eq!(q.sql, r#"DELETE FROM "app"."people" WHERE "id" = $1 RETURNING "id""#);
    }

    #[test]
    fn identifiers_are_escaped() {
        assert_eq!(quoted(r#"a"b"#), r#""a""b""#);
    }
}
