//! # Automap
//!
//! Runtime schema inspection and ORM-style entity mapping for existing
//! relational databases.
//!
//! Point it at a live connection — legacy naming, missing constraints and
//! all — and it synthesizes one entity type per table: normalized attribute
//! aliases, primary-key-aware lookup, and belongs-to relationships wired
//! from declared foreign keys or inferred from naming conventions when the
//! engine cannot report them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Adapter Registry                     │
//! │        (engine id → optional metadata probes)           │
//! └─────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼ [probe-else-native dispatch]
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Schema Inspector                      │
//! │  (memoized tables/columns/keys + heuristic FK fallback) │
//! └─────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼ [two-pass synthesis]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Mapping Synthesizer                    │
//! │     (entities, aliases, belongs-to relationships)       │
//! └─────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼ [explicit, optional]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Registration sink                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline is synchronous and flows strictly forward; the naming
//! normalizer is consulted during synthesis. Each run produces an
//! independent universe of entities bound to its own connection.
//!
//! ## Example
//!
//! ```
//! use automap::connection::{SqliteConnection, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = SqliteConnection::open_in_memory()?;
//! conn.execute_batch(
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
//!      CREATE TABLE orders (
//!          id INTEGER PRIMARY KEY,
//!          user_id INTEGER REFERENCES users(id)
//!      );
//!      INSERT INTO users VALUES (5, 'ada');
//!      INSERT INTO orders VALUES (1, 5);",
//! )?;
//!
//! let map = automap::inspect(&conn, "")?;
//! let order = map
//!     .entity("Order")
//!     .unwrap()
//!     .find_by_key(&conn, &Value::Integer(1))?
//!     .unwrap();
//!
//! let user = map.related(&conn, &order, "users")?.unwrap();
//! assert_eq!(user.raw("name"), Some(&Value::Text("ada".to_string())));
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod connection;
pub mod error;
pub mod inspector;
pub mod mapping;
pub mod naming;

pub use adapter::{adapter_for, register_adapter, AdapterDescriptor, AdapterRegistry};
pub use connection::Connection;
pub use error::{AdapterError, ConnectionError, MapError, MapResult, RegistryError};
pub use mapping::{MapOptions, SchemaMap};

/// Inspect a connection with default options and the process-wide adapter
/// registry. See [`SchemaMap::inspect`] for the injectable form.
pub fn inspect(conn: &dyn Connection, subschema: &str) -> MapResult<SchemaMap> {
    SchemaMap::inspect(
        conn,
        &MapOptions::default().with_subschema(subschema),
        AdapterRegistry::global(),
    )
}

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::adapter::{AdapterDescriptor, AdapterRegistry};
    pub use crate::connection::{
        ColumnDescriptor, ColumnType, Connection, ForeignKeyDescriptor, ForeignKeyOrigin,
        MemoryConnection, MemoryTable, PrimaryKey, Row, SqliteConnection, Value,
    };
    pub use crate::error::{
        AdapterError, ConnectionError, ConnectionResult, MapError, MapResult, RegistryError,
    };
    pub use crate::inspector::SchemaInspector;
    pub use crate::mapping::{
        BelongsTo, Entity, MapOptions, NamespaceTree, Record, Registrar, SchemaMap,
        TableDescriptor,
    };
}
