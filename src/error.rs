//! Error types for inspection, mapping, and registration.
//!
//! Each layer has its own error surface: `AdapterError` for registry
//! configuration, `ConnectionError` for the database boundary, `MapError`
//! for synthesis and entity operations, and `RegistryError` for the
//! registration sink. `MapError` is the umbrella the entry points return.

use thiserror::Error;

/// Result type for connection operations.
pub type ConnectionResult<T> = Result<T, ConnectionError>;

/// Result type for inspection and mapping operations.
pub type MapResult<T> = Result<T, MapError>;

/// Errors raised by the adapter registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// An adapter is already registered for this engine identifier.
    #[error("adapter already registered for engine '{0}'")]
    AlreadyRegistered(String),

    /// The adapter for this engine has no probe for the requested operation
    /// and was configured without a native fallback.
    #[error("no adapter probe for engine '{0}' and native fallback is disabled")]
    Unregistered(String),
}

/// Errors raised by a connection while answering introspection or row queries.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// The engine does not implement this introspection capability.
    ///
    /// On the foreign-key path this is the trigger for heuristic inference;
    /// everywhere else it propagates like any other failure.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The named table does not exist in the connected database.
    #[error("table not found: '{0}'")]
    TableNotFound(String),

    /// A query failed for an engine-specific reason.
    #[error("query failed: {0}")]
    Query(String),

    /// SQLite error from the embedded connection.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl ConnectionError {
    /// Create an `Unsupported` error for the named capability.
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported(capability.into())
    }

    /// Check whether this error means the capability is not implemented.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

/// Errors raised during synthesis and by entity operations.
#[derive(Error, Debug)]
pub enum MapError {
    /// Lookup-by-key was attempted on an entity with a composite primary key.
    #[error("cannot find on compound primary key for entity '{0}'")]
    CannotFindOnCompoundPrimaryKey(String),

    /// Lookup-by-key was attempted on an entity whose table has no primary key.
    #[error("entity '{0}' has no primary key")]
    MissingPrimaryKey(String),

    /// Referenced an entity that was not synthesized in this run.
    #[error("unknown entity: '{0}'")]
    UnknownEntity(String),

    /// Referenced an attribute that doesn't exist on an entity.
    #[error("unknown attribute '{attribute}' on entity '{entity}'")]
    UnknownAttribute { entity: String, attribute: String },

    /// Referenced a relationship field that doesn't exist on an entity.
    #[error("unknown relation '{field}' on entity '{entity}'")]
    UnknownRelation { entity: String, field: String },

    /// Adapter registry configuration error.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Failure propagated unmodified from the connection.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Errors raised by the registration sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The name is already bound to a different entity in this namespace.
    #[error("name '{name}' already registered to a different entity in namespace '{namespace}'")]
    NameCollision { name: String, namespace: String },
}
