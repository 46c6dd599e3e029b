//! The connection boundary: the capability set the mapping engine consumes.
//!
//! A [`Connection`] is an opaque handle to a live database. The core only
//! asks it to list tables, describe columns, report keys, and run single-row
//! lookups; transport, pooling, and transactions are the connection's own
//! business. Two implementations ship with the crate: [`SqliteConnection`]
//! over rusqlite and the fixture-driven [`MemoryConnection`] used by tests.

mod memory;
mod sqlite;

use serde::{Deserialize, Serialize};

use crate::error::ConnectionResult;

pub use memory::{MemoryConnection, MemoryTable};
pub use sqlite::SqliteConnection;

/// Declared type tag for a column, normalized across engines.
///
/// Engines report types as free-form strings; adapters and connections map
/// them onto this small set. Anything without a clear mapping is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Boolean,
    String,
    Integer,
    Date,
    DateTime,
    Other,
}

/// A single column of a table, as reported by introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name as the engine reports it.
    pub name: String,
    /// Normalized type tag.
    pub column_type: ColumnType,
    /// Whether NULL values are allowed.
    pub nullable: bool,
    /// Raw engine-declared type, kept for round-tripping.
    pub declared_type: Option<String>,
    /// Adapter-specific extras that don't fit the normalized fields.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl ColumnDescriptor {
    /// Create a nullable column with the given name and type tag.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            declared_type: None,
            metadata: serde_json::Value::Null,
        }
    }

    /// Builder: mark the column NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Builder: record the raw engine-declared type.
    pub fn with_declared_type(mut self, declared: impl Into<String>) -> Self {
        self.declared_type = Some(declared.into());
        self
    }

    /// Check whether this column carries the boolean type tag.
    pub fn is_boolean(&self) -> bool {
        self.column_type == ColumnType::Boolean
    }
}

/// Primary key of a table: absent, a single column, or a composite.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrimaryKey {
    /// The table has no primary key.
    #[default]
    None,
    /// Single-column primary key.
    Single(String),
    /// Composite primary key, columns in key order.
    Composite(Vec<String>),
}

impl PrimaryKey {
    /// Build from an ordered column list reported by introspection.
    pub fn from_columns(mut columns: Vec<String>) -> Self {
        match columns.len() {
            0 => Self::None,
            1 => Self::Single(columns.remove(0)),
            _ => Self::Composite(columns),
        }
    }

    /// True iff the key spans more than one column.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    /// The column name of a single-column key, if that is what this is.
    pub fn single(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name),
            _ => None,
        }
    }

    /// All key columns in order (empty when there is no key).
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::None => Vec::new(),
            Self::Single(name) => vec![name.as_str()],
            Self::Composite(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// How a foreign key was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForeignKeyOrigin {
    /// Reported by the engine as a declared constraint.
    #[default]
    Declared,
    /// Synthesized by heuristic inference from naming conventions.
    Inferred,
}

impl std::fmt::Display for ForeignKeyOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declared => write!(f, "declared"),
            Self::Inferred => write!(f, "inferred"),
        }
    }
}

/// A single-column foreign key from one table to another.
///
/// Consumed once during relationship wiring; multi-column constraints have no
/// representation here and are dropped at the connection boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// Native constraint name, or a synthetic one for inferred keys.
    pub constraint_name: String,
    /// Table the key lives on (qualified form).
    pub source_table: String,
    /// Column on the source table.
    pub source_column: String,
    /// Table the key points at (qualified form).
    pub target_table: String,
    /// Column on the target table.
    pub target_column: String,
    /// Declared constraint or heuristic inference.
    pub origin: ForeignKeyOrigin,
}

/// A scalar value read from or written to a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

/// One row of a table: column names paired with values, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(name, value)` pairs.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            columns: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Set a column value, replacing an existing entry or appending.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name, value)),
        }
    }

    /// Get a column value by exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// The capability set the mapping engine consumes.
///
/// Per-table operations receive the qualified table name (subschema prefix
/// included when one is in play). Engines that cannot introspect foreign
/// keys return [`ConnectionError::Unsupported`] from `foreign_keys`; every
/// other failure propagates to the caller unmodified.
///
/// [`ConnectionError::Unsupported`]: crate::error::ConnectionError::Unsupported
pub trait Connection {
    /// Engine identifier used for adapter lookup (e.g. `"sqlite"`, `"mssql"`).
    fn engine_id(&self) -> &str;

    /// List the table names visible on this connection.
    fn list_tables(&self) -> ConnectionResult<Vec<String>>;

    /// Describe the columns of a table, in ordinal order.
    fn describe_columns(&self, table: &str) -> ConnectionResult<Vec<ColumnDescriptor>>;

    /// Report the primary key of a table.
    fn primary_key(&self, table: &str) -> ConnectionResult<PrimaryKey>;

    /// Report the declared foreign keys whose source is this table.
    fn foreign_keys(&self, table: &str) -> ConnectionResult<Vec<ForeignKeyDescriptor>>;

    /// Fetch the first row of `table` where `column` equals `value`.
    ///
    /// A `Null` probe value never matches, mirroring SQL comparison rules.
    fn select_by_column(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> ConnectionResult<Option<Row>>;
}
