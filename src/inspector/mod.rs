//! Memoized schema introspection over probe-else-native dispatch.
//!
//! A [`SchemaInspector`] wraps one connection for one synthesis run. Each
//! operation consults the engine's adapter probe when present, otherwise the
//! connection's native capability, and memoizes the answer so no query runs
//! more than once per table per operation kind.
//!
//! Foreign keys are special: when the native capability reports an
//! unsupported operation (and only then), the inspector falls back to
//! heuristic inference from column naming conventions. Any other native
//! failure propagates unmodified.
//!
//! The caches are plain per-instance maps. An inspector belongs to a single
//! invocation's synchronous pipeline and is deliberately not thread-safe.

mod inference;

use std::collections::HashMap;

use crate::adapter::{AdapterDescriptor, AdapterRegistry};
use crate::connection::{ColumnDescriptor, Connection, ForeignKeyDescriptor, PrimaryKey};
use crate::error::{AdapterError, MapResult};

/// Memoized introspection facade over one connection.
pub struct SchemaInspector<'a> {
    conn: &'a dyn Connection,
    adapter: AdapterDescriptor,
    infer_foreign_keys: bool,
    tables: Option<Vec<String>>,
    columns: HashMap<String, Vec<ColumnDescriptor>>,
    primary_keys: HashMap<String, PrimaryKey>,
    foreign_keys: HashMap<String, Vec<ForeignKeyDescriptor>>,
}

impl<'a> SchemaInspector<'a> {
    /// Create an inspector, resolving the adapter from the registry by the
    /// connection's engine identifier. Unknown engines get an empty adapter
    /// and run entirely on native capability.
    pub fn new(conn: &'a dyn Connection, registry: &AdapterRegistry) -> Self {
        let adapter = registry.adapter_for(conn.engine_id());
        Self::with_adapter(conn, adapter)
    }

    /// Create an inspector with an explicit adapter descriptor.
    pub fn with_adapter(conn: &'a dyn Connection, adapter: AdapterDescriptor) -> Self {
        Self {
            conn,
            adapter,
            infer_foreign_keys: true,
            tables: None,
            columns: HashMap::new(),
            primary_keys: HashMap::new(),
            foreign_keys: HashMap::new(),
        }
    }

    /// Builder: enable or disable heuristic foreign-key inference. When
    /// disabled, an unsupported native capability yields no foreign keys.
    pub fn infer_foreign_keys(mut self, enabled: bool) -> Self {
        self.infer_foreign_keys = enabled;
        self
    }

    pub fn connection(&self) -> &dyn Connection {
        self.conn
    }

    fn missing_probe(&self) -> AdapterError {
        AdapterError::Unregistered(self.adapter.engine_id().to_string())
    }

    /// List the tables visible on this connection.
    pub fn tables(&mut self) -> MapResult<Vec<String>> {
        if let Some(tables) = &self.tables {
            return Ok(tables.clone());
        }

        let tables = match self.adapter.tables.clone() {
            Some(probe) => probe(self.conn)?,
            None if self.adapter.native_fallback() => self.conn.list_tables()?,
            None => return Err(self.missing_probe().into()),
        };
        self.tables = Some(tables.clone());
        Ok(tables)
    }

    /// Describe the columns of a table.
    pub fn columns_of(&mut self, table: &str) -> MapResult<Vec<ColumnDescriptor>> {
        if let Some(columns) = self.columns.get(table) {
            return Ok(columns.clone());
        }

        let columns = match self.adapter.columns.clone() {
            Some(probe) => probe(self.conn, table)?,
            None if self.adapter.native_fallback() => self.conn.describe_columns(table)?,
            None => return Err(self.missing_probe().into()),
        };
        self.columns.insert(table.to_string(), columns.clone());
        Ok(columns)
    }

    /// Report the primary key of a table.
    pub fn primary_key_of(&mut self, table: &str) -> MapResult<PrimaryKey> {
        if let Some(key) = self.primary_keys.get(table) {
            return Ok(key.clone());
        }

        let key = match self.adapter.primary_key.clone() {
            Some(probe) => probe(self.conn, table)?,
            None if self.adapter.native_fallback() => self.conn.primary_key(table)?,
            None => return Err(self.missing_probe().into()),
        };
        self.primary_keys.insert(table.to_string(), key.clone());
        Ok(key)
    }

    /// Report the foreign keys whose source is `table`.
    ///
    /// Probe if present, else native capability, else — on an
    /// unsupported-operation failure only — heuristic inference.
    pub fn foreign_keys_of(&mut self, table: &str) -> MapResult<Vec<ForeignKeyDescriptor>> {
        if let Some(keys) = self.foreign_keys.get(table) {
            return Ok(keys.clone());
        }

        let keys = match self.adapter.foreign_keys.clone() {
            Some(probe) => probe(self.conn, table)?,
            None if self.adapter.native_fallback() => match self.conn.foreign_keys(table) {
                Ok(keys) => keys,
                Err(err) if err.is_unsupported() => {
                    if self.infer_foreign_keys {
                        log::debug!(
                            "engine '{}' cannot report foreign keys for '{}'; inferring from column names",
                            self.conn.engine_id(),
                            table
                        );
                        self.inferred_foreign_keys(table)?
                    } else {
                        Vec::new()
                    }
                }
                Err(err) => return Err(err.into()),
            },
            None => return Err(self.missing_probe().into()),
        };
        self.foreign_keys.insert(table.to_string(), keys.clone());
        Ok(keys)
    }
}
