//! SQLite-backed connection over rusqlite.
//!
//! Introspection uses `sqlite_master` and the `table_info` /
//! `foreign_key_list` pragmas. SQLite reports foreign keys natively, so this
//! connection never triggers heuristic inference.

use rusqlite::params;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use crate::error::{ConnectionError, ConnectionResult};

use super::{
    ColumnDescriptor, ColumnType, Connection, ForeignKeyDescriptor, ForeignKeyOrigin, PrimaryKey,
    Row, Value,
};

/// A [`Connection`] over an embedded SQLite database.
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl SqliteConnection {
    /// Open a database file, creating it if missing.
    pub fn open(path: impl AsRef<std::path::Path>) -> ConnectionResult<Self> {
        Ok(Self {
            conn: rusqlite::Connection::open(path)?,
        })
    }

    /// Open a fresh in-memory database.
    pub fn open_in_memory() -> ConnectionResult<Self> {
        Ok(Self {
            conn: rusqlite::Connection::open_in_memory()?,
        })
    }

    /// Wrap an already-open rusqlite connection.
    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        Self { conn }
    }

    /// Run a batch of SQL statements (schema setup, fixtures).
    pub fn execute_batch(&self, sql: &str) -> ConnectionResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Rows of `PRAGMA table_info`, shared by column and key introspection.
    fn table_info(&self, table: &str) -> ConnectionResult<Vec<TableInfoRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
        let rows = stmt.query_map([], |row| {
            Ok(TableInfoRow {
                name: row.get(1)?,
                declared_type: row.get(2)?,
                not_null: row.get::<_, i64>(3)? != 0,
                pk_ordinal: row.get(5)?,
            })
        })?;

        let info: Vec<TableInfoRow> = rows.collect::<Result<_, _>>()?;
        if info.is_empty() {
            return Err(ConnectionError::TableNotFound(table.to_string()));
        }
        Ok(info)
    }
}

struct TableInfoRow {
    name: String,
    declared_type: String,
    not_null: bool,
    pk_ordinal: i64,
}

impl Connection for SqliteConnection {
    fn engine_id(&self) -> &str {
        "sqlite"
    }

    fn list_tables(&self) -> ConnectionResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn describe_columns(&self, table: &str) -> ConnectionResult<Vec<ColumnDescriptor>> {
        let info = self.table_info(table)?;
        Ok(info
            .into_iter()
            .map(|row| ColumnDescriptor {
                column_type: column_type_from_declared(&row.declared_type),
                nullable: !row.not_null,
                declared_type: Some(row.declared_type),
                name: row.name,
                metadata: serde_json::Value::Null,
            })
            .collect())
    }

    fn primary_key(&self, table: &str) -> ConnectionResult<PrimaryKey> {
        let mut key_columns: Vec<(i64, String)> = self
            .table_info(table)?
            .into_iter()
            .filter(|row| row.pk_ordinal > 0)
            .map(|row| (row.pk_ordinal, row.name))
            .collect();
        key_columns.sort_by_key(|(ordinal, _)| *ordinal);

        Ok(PrimaryKey::from_columns(
            key_columns.into_iter().map(|(_, name)| name).collect(),
        ))
    }

    fn foreign_keys(&self, table: &str) -> ConnectionResult<Vec<ForeignKeyDescriptor>> {
        let mut stmt = self.conn.prepare(&format!(
            "PRAGMA foreign_key_list({})",
            quote_identifier(table)
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,            // constraint id
                row.get::<_, String>(2)?,         // target table
                row.get::<_, String>(3)?,         // source column
                row.get::<_, Option<String>>(4)?, // target column, NULL = implicit pk
            ))
        })?;
        let raw: Vec<(i64, String, String, Option<String>)> = rows.collect::<Result<_, _>>()?;

        let mut keys = Vec::new();
        for (id, target_table, source_column, target_column) in &raw {
            // Multi-column constraints share an id; there is no single-pair
            // mapping for them, so they are dropped here.
            if raw.iter().filter(|(other, ..)| other == id).count() > 1 {
                continue;
            }

            let target_column = match target_column {
                Some(column) => column.clone(),
                None => match self.primary_key(target_table)? {
                    PrimaryKey::Single(column) => column,
                    _ => continue,
                },
            };

            keys.push(ForeignKeyDescriptor {
                constraint_name: format!("fk_{}_{}", table, id),
                source_table: table.to_string(),
                source_column: source_column.clone(),
                target_table: target_table.clone(),
                target_column,
                origin: ForeignKeyOrigin::Declared,
            });
        }
        Ok(keys)
    }

    fn select_by_column(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> ConnectionResult<Option<Row>> {
        if value.is_null() {
            return Ok(None);
        }

        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 LIMIT 1",
            quote_identifier(table),
            quote_identifier(column)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let column_names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params![value])?;
        match rows.next()? {
            Some(row) => {
                let mut out = Row::new();
                for (index, name) in column_names.iter().enumerate() {
                    out.set(name.clone(), row.get::<_, Value>(index)?);
                }
                Ok(Some(out))
            }
            None => Ok(None),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use rusqlite::types::Value as SqlValue;
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(SqlValue::Null),
            Value::Boolean(v) => ToSqlOutput::Owned(SqlValue::Integer(*v as i64)),
            Value::Integer(v) => ToSqlOutput::Owned(SqlValue::Integer(*v)),
            Value::Real(v) => ToSqlOutput::Owned(SqlValue::Real(*v)),
            Value::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Integer(v),
            ValueRef::Real(v) => Value::Real(v),
            ValueRef::Text(v) => Value::Text(String::from_utf8_lossy(v).into_owned()),
            // The value model has no binary variant; blobs read as NULL.
            ValueRef::Blob(_) => Value::Null,
        })
    }
}

/// Quote an identifier for interpolation into SQL text.
///
/// Qualified names are quoted per dot-separated part so `dbo.Orders` stays
/// a schema reference rather than a single quoted name.
fn quote_identifier(name: &str) -> String {
    name.split('.')
        .map(|part| format!("\"{}\"", part.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(".")
}

/// Map a SQLite declared type to a normalized tag.
///
/// Follows SQLite's own affinity rules where they apply, with explicit
/// handling for the date/time and boolean names ORMs commonly declare.
fn column_type_from_declared(declared: &str) -> ColumnType {
    let lower = declared.to_lowercase();

    if lower.contains("bool") || lower == "bit" {
        ColumnType::Boolean
    } else if lower.contains("datetime") || lower.contains("timestamp") {
        ColumnType::DateTime
    } else if lower == "date" {
        ColumnType::Date
    } else if lower.contains("int") {
        ColumnType::Integer
    } else if lower.contains("char") || lower.contains("text") || lower.contains("clob") {
        ColumnType::String
    } else {
        ColumnType::Other
    }
}
