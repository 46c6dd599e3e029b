//! Synthesized entity types and their records.
//!
//! An [`Entity`] is a data-driven descriptor, not a generated type: an
//! attribute table mapping lookup aliases to columns, plus a relation table
//! resolved by name at traversal time. A [`Record`] is one row viewed
//! through an entity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::connection::{Connection, PrimaryKey, Row, Value};
use crate::error::{MapError, MapResult};

/// A many-to-one relationship from one entity to another.
///
/// Resolution is lazy and keyed by the declared `(source_column,
/// target_column)` pair; neither side is assumed to be named `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BelongsTo {
    /// Field name: the target table's base name.
    pub field: String,
    /// Secondary field name: the target's normalized entity name.
    pub alias_field: String,
    /// Entity the relation resolves to.
    pub target_entity: String,
    /// Column on the source table holding the reference.
    pub source_column: String,
    /// Column on the target table the reference points at.
    pub target_column: String,
}

impl BelongsTo {
    /// Whether `field` names this relation, by either of its field names.
    pub fn answers_to(&self, field: &str) -> bool {
        self.field == field || self.alias_field == field
    }
}

/// The synthesized in-memory type for one database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Normalized entity name.
    pub name: String,
    /// Qualified name of the backing table.
    pub table: String,
    /// Primary key of the backing table.
    pub primary_key: PrimaryKey,
    /// Lookup alias → raw column name. Raw names are included as aliases of
    /// themselves.
    pub attributes: BTreeMap<String, String>,
    /// Belongs-to relations, attached during relationship wiring.
    pub relations: Vec<BelongsTo>,
}

impl Entity {
    /// Resolve an attribute alias to its raw column name.
    pub fn attribute_column(&self, alias: &str) -> Option<&str> {
        self.attributes.get(alias).map(String::as_str)
    }

    /// Read an attribute from a record, by raw name or normalized alias.
    pub fn get<'r>(&self, record: &'r Record, attribute: &str) -> MapResult<&'r Value> {
        let column = self.require_column(attribute)?;
        Ok(record.row.get(column).unwrap_or(&Value::Null))
    }

    /// Write an attribute on a record, by raw name or normalized alias.
    pub fn set(&self, record: &mut Record, attribute: &str, value: Value) -> MapResult<()> {
        let column = self.require_column(attribute)?.to_string();
        record.row.set(column, value);
        Ok(())
    }

    /// Fetch the record whose primary key equals `key`, or `None`.
    ///
    /// Composite-key entities never support direct lookup-by-key: the call
    /// fails before touching the connection. Attribute access and
    /// relationship traversal remain available on them.
    pub fn find_by_key(&self, conn: &dyn Connection, key: &Value) -> MapResult<Option<Record>> {
        match &self.primary_key {
            PrimaryKey::Composite(_) => Err(MapError::CannotFindOnCompoundPrimaryKey(
                self.name.clone(),
            )),
            PrimaryKey::None => Err(MapError::MissingPrimaryKey(self.name.clone())),
            PrimaryKey::Single(column) => {
                let row = conn.select_by_column(&self.table, column, key)?;
                Ok(row.map(|row| Record::new(self.name.as_str(), row)))
            }
        }
    }

    /// Find a relation by either of its field names.
    pub fn relation(&self, field: &str) -> Option<&BelongsTo> {
        self.relations.iter().find(|rel| rel.answers_to(field))
    }

    fn require_column(&self, attribute: &str) -> MapResult<&str> {
        self.attribute_column(attribute)
            .ok_or_else(|| MapError::UnknownAttribute {
                entity: self.name.clone(),
                attribute: attribute.to_string(),
            })
    }
}

/// One row of data viewed through a synthesized entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    entity: String,
    row: Row,
}

impl Record {
    pub fn new(entity: impl Into<String>, row: Row) -> Self {
        Self {
            entity: entity.into(),
            row,
        }
    }

    /// Name of the entity this record belongs to.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The underlying row, keyed by raw column names.
    pub fn row(&self) -> &Row {
        &self.row
    }

    /// Read a raw column value directly, bypassing alias resolution.
    pub fn raw(&self, column: &str) -> Option<&Value> {
        self.row.get(column)
    }
}
