//! The mapping synthesizer: tables in, related entity types out.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    SchemaInspector                       │
//! │        (memoized probe-else-native introspection)        │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ [pass 1]
//! ┌──────────────────────────────────────────────────────────┐
//! │   TableDescriptor per table: normalized names, aliases,  │
//! │   primary key, entity                                    │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ [pass 2]
//! ┌──────────────────────────────────────────────────────────┐
//! │   Belongs-to relations wired from foreign keys, both     │
//! │   endpoints resolved against the synthesized set         │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼ [optional, explicit]
//! ┌──────────────────────────────────────────────────────────┐
//! │           Registrar (namespace registration)             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Synthesis is pure: it returns a [`SchemaMap`] of descriptors and touches
//! no process-wide state. Registration is a separate step consuming the
//! returned map.

mod entity;
mod registrar;
mod synthesizer;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::connection::{ColumnDescriptor, ForeignKeyDescriptor, PrimaryKey};

pub use entity::{BelongsTo, Entity, Record};
pub use registrar::{NamespaceTree, Registrar};
pub use synthesizer::SchemaMap;

/// Options for one inspection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapOptions {
    /// Subschema namespace prefix; empty means no namespace filtering.
    pub subschema: String,
    /// Whether to infer foreign keys by naming convention when the engine
    /// cannot report them natively.
    pub infer_foreign_keys: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            subschema: String::new(),
            infer_foreign_keys: true,
        }
    }
}

impl MapOptions {
    /// Builder: restrict inspection to one subschema.
    pub fn with_subschema(mut self, subschema: impl Into<String>) -> Self {
        self.subschema = subschema.into();
        self
    }

    /// Builder: enable or disable heuristic foreign-key inference.
    pub fn with_foreign_key_inference(mut self, enabled: bool) -> Self {
        self.infer_foreign_keys = enabled;
        self
    }
}

/// Everything synthesis learned about one table.
///
/// Built in pass 1, its entity's relations attached in pass 2, then handed
/// out read-only as part of the [`SchemaMap`].
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    /// Table name with any subschema prefix, unique per run.
    pub qualified_name: String,
    /// Qualified name with the namespace prefix stripped.
    pub base_name: String,
    /// Normalized class-like name the entity registers under.
    pub entity_name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnDescriptor>,
    /// Primary key as introspected.
    pub primary_key: PrimaryKey,
    /// Lookup alias → index into `columns`. Raw names are seeded first and
    /// always win; a normalized alias that collides is dropped, not
    /// overwritten.
    pub column_aliases: BTreeMap<String, usize>,
    /// The synthesized entity type for this table.
    pub entity: Entity,
    /// Foreign keys whose source is this table.
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl TableDescriptor {
    /// True iff the primary key spans more than one column.
    pub fn is_composite(&self) -> bool {
        self.primary_key.is_composite()
    }

    /// Resolve a column by raw name or accepted normalized alias.
    pub fn column(&self, alias: &str) -> Option<&ColumnDescriptor> {
        self.column_aliases
            .get(alias)
            .and_then(|&index| self.columns.get(index))
    }
}
