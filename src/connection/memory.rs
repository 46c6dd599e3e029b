//! Fixture-driven in-memory connection.
//!
//! Used by tests and doc examples to exercise the mapping pipeline without a
//! real database. Tables are declared up front; per-operation call counters
//! make memoization observable, and foreign-key support can be switched off
//! to drive the heuristic inference path.

use std::cell::Cell;

use crate::error::{ConnectionError, ConnectionResult};

use super::{ColumnDescriptor, Connection, ForeignKeyDescriptor, PrimaryKey, Row, Value};

/// Declared metadata and fixture rows for one in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    pub columns: Vec<ColumnDescriptor>,
    pub primary_key: PrimaryKey,
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
    pub rows: Vec<Row>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_primary_key(mut self, primary_key: PrimaryKey) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_foreign_key(mut self, foreign_key: ForeignKeyDescriptor) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }
}

/// Number of native calls the connection has answered, per operation.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub tables: Cell<usize>,
    pub columns: Cell<usize>,
    pub primary_key: Cell<usize>,
    pub foreign_keys: Cell<usize>,
    pub select: Cell<usize>,
}

/// A [`Connection`] over declared fixtures.
pub struct MemoryConnection {
    engine_id: String,
    tables: Vec<(String, MemoryTable)>,
    supports_foreign_keys: bool,
    calls: CallCounts,
}

impl MemoryConnection {
    pub fn new(engine_id: impl Into<String>) -> Self {
        Self {
            engine_id: engine_id.into(),
            tables: Vec::new(),
            supports_foreign_keys: true,
            calls: CallCounts::default(),
        }
    }

    /// Builder: make `foreign_keys` fail with an unsupported-operation error,
    /// the condition that triggers heuristic inference.
    pub fn without_foreign_key_support(mut self) -> Self {
        self.supports_foreign_keys = false;
        self
    }

    /// Builder: declare a table under its qualified name.
    pub fn with_table(mut self, name: impl Into<String>, table: MemoryTable) -> Self {
        self.tables.push((name.into(), table));
        self
    }

    /// Native call counters, for memoization assertions.
    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    fn table(&self, name: &str) -> ConnectionResult<&MemoryTable> {
        // Exact match first; an unqualified declaration also answers to a
        // qualified request, the way engines resolve schema-qualified names.
        let base = crate::naming::base_name(name);
        self.tables
            .iter()
            .find(|(declared, _)| declared == name)
            .or_else(|| {
                self.tables
                    .iter()
                    .find(|(declared, _)| !declared.contains('.') && declared == base)
            })
            .map(|(_, table)| table)
            .ok_or_else(|| ConnectionError::TableNotFound(name.to_string()))
    }
}

impl Connection for MemoryConnection {
    fn engine_id(&self) -> &str {
        &self.engine_id
    }

    fn list_tables(&self) -> ConnectionResult<Vec<String>> {
        self.calls.tables.set(self.calls.tables.get() + 1);
        Ok(self.tables.iter().map(|(name, _)| name.clone()).collect())
    }

    fn describe_columns(&self, table: &str) -> ConnectionResult<Vec<ColumnDescriptor>> {
        self.calls.columns.set(self.calls.columns.get() + 1);
        Ok(self.table(table)?.columns.clone())
    }

    fn primary_key(&self, table: &str) -> ConnectionResult<PrimaryKey> {
        self.calls.primary_key.set(self.calls.primary_key.get() + 1);
        Ok(self.table(table)?.primary_key.clone())
    }

    fn foreign_keys(&self, table: &str) -> ConnectionResult<Vec<ForeignKeyDescriptor>> {
        self.calls.foreign_keys.set(self.calls.foreign_keys.get() + 1);
        if !self.supports_foreign_keys {
            return Err(ConnectionError::unsupported("foreign_keys"));
        }
        Ok(self.table(table)?.foreign_keys.clone())
    }

    fn select_by_column(
        &self,
        table: &str,
        column: &str,
        value: &Value,
    ) -> ConnectionResult<Option<Row>> {
        self.calls.select.set(self.calls.select.get() + 1);
        if value.is_null() {
            return Ok(None);
        }

        Ok(self
            .table(table)?
            .rows
            .iter()
            .find(|row| row.get(column) == Some(value))
            .cloned())
    }
}
