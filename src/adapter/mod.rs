//! Adapter descriptors and the engine registry.
//!
//! An adapter overrides how one engine's metadata is retrieved: up to four
//! probe functions, each optional. A missing probe means the operation falls
//! through to the connection's native capability (unless the adapter was
//! built [`without_native_fallback`]).
//!
//! The registry maps engine identifier to adapter. It is safe for concurrent
//! reads; concurrent registration of the same identifier is serialized and
//! the second writer fails with [`AdapterError::AlreadyRegistered`]. Unknown
//! engines are not an error — lookup returns an empty descriptor and every
//! operation uses the native capability.
//!
//! The registry is an explicit object so tests can build fresh ones; a
//! process-wide instance is available through [`AdapterRegistry::global`].
//!
//! [`without_native_fallback`]: AdapterDescriptor::without_native_fallback

use std::sync::{Arc, LazyLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::connection::{ColumnDescriptor, Connection, ForeignKeyDescriptor, PrimaryKey};
use crate::error::{AdapterError, ConnectionResult};

/// Probe overriding the table-list operation.
pub type TablesProbe = Arc<dyn Fn(&dyn Connection) -> ConnectionResult<Vec<String>> + Send + Sync>;

/// Probe overriding column introspection for one table.
pub type ColumnsProbe =
    Arc<dyn Fn(&dyn Connection, &str) -> ConnectionResult<Vec<ColumnDescriptor>> + Send + Sync>;

/// Probe overriding primary-key introspection for one table.
pub type PrimaryKeyProbe =
    Arc<dyn Fn(&dyn Connection, &str) -> ConnectionResult<PrimaryKey> + Send + Sync>;

/// Probe overriding foreign-key introspection for one table.
pub type ForeignKeysProbe = Arc<
    dyn Fn(&dyn Connection, &str) -> ConnectionResult<Vec<ForeignKeyDescriptor>> + Send + Sync,
>;

/// Metadata probes for one database engine. Immutable once registered.
#[derive(Clone)]
pub struct AdapterDescriptor {
    engine_id: String,
    native_fallback: bool,
    pub tables: Option<TablesProbe>,
    pub columns: Option<ColumnsProbe>,
    pub primary_key: Option<PrimaryKeyProbe>,
    pub foreign_keys: Option<ForeignKeysProbe>,
}

impl AdapterDescriptor {
    /// Create a descriptor with no probes; every operation falls through to
    /// the connection's native capability.
    pub fn new(engine_id: impl Into<String>) -> Self {
        Self {
            engine_id: engine_id.into(),
            native_fallback: true,
            tables: None,
            columns: None,
            primary_key: None,
            foreign_keys: None,
        }
    }

    /// Alias of [`new`](Self::new); reads better at lookup fallback sites.
    pub fn empty(engine_id: impl Into<String>) -> Self {
        Self::new(engine_id)
    }

    pub fn engine_id(&self) -> &str {
        &self.engine_id
    }

    /// Whether operations without a probe may use the native capability.
    pub fn native_fallback(&self) -> bool {
        self.native_fallback
    }

    /// Builder: fail with [`AdapterError::Unregistered`] instead of falling
    /// through to native capability when a probe is missing.
    pub fn without_native_fallback(mut self) -> Self {
        self.native_fallback = false;
        self
    }

    /// Builder: override the table-list operation.
    pub fn with_tables<F>(mut self, probe: F) -> Self
    where
        F: Fn(&dyn Connection) -> ConnectionResult<Vec<String>> + Send + Sync + 'static,
    {
        self.tables = Some(Arc::new(probe));
        self
    }

    /// Builder: override column introspection.
    pub fn with_columns<F>(mut self, probe: F) -> Self
    where
        F: Fn(&dyn Connection, &str) -> ConnectionResult<Vec<ColumnDescriptor>>
            + Send
            + Sync
            + 'static,
    {
        self.columns = Some(Arc::new(probe));
        self
    }

    /// Builder: override primary-key introspection.
    pub fn with_primary_key<F>(mut self, probe: F) -> Self
    where
        F: Fn(&dyn Connection, &str) -> ConnectionResult<PrimaryKey> + Send + Sync + 'static,
    {
        self.primary_key = Some(Arc::new(probe));
        self
    }

    /// Builder: override foreign-key introspection.
    pub fn with_foreign_keys<F>(mut self, probe: F) -> Self
    where
        F: Fn(&dyn Connection, &str) -> ConnectionResult<Vec<ForeignKeyDescriptor>>
            + Send
            + Sync
            + 'static,
    {
        self.foreign_keys = Some(Arc::new(probe));
        self
    }
}

impl std::fmt::Debug for AdapterDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterDescriptor")
            .field("engine_id", &self.engine_id)
            .field("native_fallback", &self.native_fallback)
            .field("tables", &self.tables.is_some())
            .field("columns", &self.columns.is_some())
            .field("primary_key", &self.primary_key.is_some())
            .field("foreign_keys", &self.foreign_keys.is_some())
            .finish()
    }
}

/// Engine identifier → adapter descriptor, safe for concurrent access.
#[derive(Debug, Default)]
pub struct AdapterRegistry {
    adapters: DashMap<String, AdapterDescriptor>,
}

static GLOBAL_REGISTRY: LazyLock<AdapterRegistry> = LazyLock::new(AdapterRegistry::new);

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the convenience entry points.
    pub fn global() -> &'static AdapterRegistry {
        &GLOBAL_REGISTRY
    }

    /// Register an adapter under its engine identifier.
    ///
    /// At most one adapter per identifier: under concurrent registration the
    /// first writer wins and the second fails.
    pub fn register(&self, adapter: AdapterDescriptor) -> Result<(), AdapterError> {
        match self.adapters.entry(adapter.engine_id().to_string()) {
            Entry::Occupied(_) => Err(AdapterError::AlreadyRegistered(
                adapter.engine_id().to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(adapter);
                Ok(())
            }
        }
    }

    /// Look up the adapter for an engine, or an empty descriptor when none
    /// is registered.
    pub fn adapter_for(&self, engine_id: &str) -> AdapterDescriptor {
        self.adapters
            .get(engine_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| AdapterDescriptor::empty(engine_id))
    }

    /// Check whether an adapter is registered for an engine.
    pub fn is_registered(&self, engine_id: &str) -> bool {
        self.adapters.contains_key(engine_id)
    }
}

/// Register an adapter in the process-wide registry.
pub fn register_adapter(adapter: AdapterDescriptor) -> Result<(), AdapterError> {
    AdapterRegistry::global().register(adapter)
}

/// Look up an adapter in the process-wide registry.
pub fn adapter_for(engine_id: &str) -> AdapterDescriptor {
    AdapterRegistry::global().adapter_for(engine_id)
}
