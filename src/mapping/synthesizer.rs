//! Two-pass synthesis: build every entity, then wire relationships.
//!
//! Relationships reference entities by name, so no relation is attached
//! until every table in the run has its entity — forward and circular
//! references resolve the same way.

use std::collections::{BTreeMap, HashMap};

use crate::adapter::AdapterRegistry;
use crate::connection::{Connection, Value};
use crate::error::{MapError, MapResult, RegistryError};
use crate::inspector::SchemaInspector;
use crate::naming;

use super::entity::{BelongsTo, Entity, Record};
use super::registrar::Registrar;
use super::{MapOptions, TableDescriptor};

/// The universe of entity types synthesized by one inspection run.
///
/// Table order follows the inspector's table list. Qualified names are
/// unique; when two tables normalize to the same entity name, the
/// last-synthesized table wins the entity-name lookup (a warning names both
/// tables) while both descriptors stay in the set.
#[derive(Debug, Clone)]
pub struct SchemaMap {
    tables: Vec<TableDescriptor>,
    by_entity: HashMap<String, usize>,
    by_base: HashMap<String, usize>,
}

impl SchemaMap {
    /// Inspect a connection and synthesize one entity type per table.
    ///
    /// The primary entry point of the mapping synthesizer. Synthesis is
    /// all-or-nothing: a failure on any table aborts the run, since a
    /// partial schema would silently drop relationships.
    pub fn inspect(
        conn: &dyn Connection,
        options: &MapOptions,
        registry: &AdapterRegistry,
    ) -> MapResult<SchemaMap> {
        let mut inspector =
            SchemaInspector::new(conn, registry).infer_foreign_keys(options.infer_foreign_keys);
        let prefix = naming::normalize_subschema(&options.subschema);

        // Pass 1: build every table descriptor and its entity.
        let mut map = SchemaMap {
            tables: Vec::new(),
            by_entity: HashMap::new(),
            by_base: HashMap::new(),
        };
        for listed in inspector.tables()? {
            let Some(qualified) = qualify(&listed, &prefix) else {
                continue;
            };
            let descriptor = build_table(&mut inspector, qualified)?;
            map.push(descriptor);
        }

        // Pass 2: wire belongs-to relations now that every entity exists.
        map.wire_relationships();
        Ok(map)
    }

    /// All synthesized table descriptors, in inspection order.
    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    /// Look up an entity by its normalized entity name.
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.by_entity
            .get(name)
            .map(|&index| &self.tables[index].entity)
    }

    /// Look up a table descriptor by its namespace-stripped base name.
    pub fn table_by_base(&self, base_name: &str) -> Option<&TableDescriptor> {
        self.by_base.get(base_name).map(|&index| &self.tables[index])
    }

    /// Traverse a belongs-to relation from a record, lazily.
    ///
    /// Resolves the relation by field name (target base name or entity-name
    /// alias), reads the record's source column, and fetches the single
    /// matching target record — `None` when the source value is NULL or no
    /// row matches.
    pub fn related(
        &self,
        conn: &dyn Connection,
        record: &Record,
        field: &str,
    ) -> MapResult<Option<Record>> {
        let entity = self
            .entity(record.entity())
            .ok_or_else(|| MapError::UnknownEntity(record.entity().to_string()))?;
        let relation = entity
            .relation(field)
            .ok_or_else(|| MapError::UnknownRelation {
                entity: entity.name.clone(),
                field: field.to_string(),
            })?;

        let value = record
            .raw(&relation.source_column)
            .cloned()
            .unwrap_or(Value::Null);
        if value.is_null() {
            return Ok(None);
        }

        // Wiring guarantees the target was synthesized in this run.
        let target = self
            .entity(&relation.target_entity)
            .ok_or_else(|| MapError::UnknownEntity(relation.target_entity.clone()))?;
        let row = conn.select_by_column(&target.table, &relation.target_column, &value)?;
        Ok(row.map(|row| Record::new(target.name.as_str(), row)))
    }

    /// Register every synthesized entity into a registration sink under its
    /// entity name, creating namespace segments as needed.
    ///
    /// When the entity-name collision policy dropped a table from the
    /// entity-name lookup, only the winning table is registered.
    pub fn register_into(
        &self,
        registrar: &mut dyn Registrar,
        namespace: &[&str],
    ) -> Result<(), RegistryError> {
        for (index, table) in self.tables.iter().enumerate() {
            if self.by_entity.get(&table.entity_name) != Some(&index) {
                continue;
            }
            registrar.register(&table.entity, &table.entity_name, namespace)?;
        }
        Ok(())
    }

    fn push(&mut self, descriptor: TableDescriptor) {
        let index = self.tables.len();
        if let Some(&previous) = self.by_entity.get(&descriptor.entity_name) {
            log::warn!(
                "tables '{}' and '{}' both normalize to entity '{}'; keeping the latter",
                self.tables[previous].qualified_name,
                descriptor.qualified_name,
                descriptor.entity_name
            );
        }
        self.by_entity
            .insert(descriptor.entity_name.clone(), index);
        self.by_base.insert(descriptor.base_name.clone(), index);
        self.tables.push(descriptor);
    }

    fn wire_relationships(&mut self) {
        let foreign_keys: Vec<_> = self
            .tables
            .iter()
            .flat_map(|table| table.foreign_keys.iter().cloned())
            .collect();

        for fk in foreign_keys {
            let source = self.by_base.get(naming::base_name(&fk.source_table)).copied();
            let target = self.by_base.get(naming::base_name(&fk.target_table)).copied();
            let (Some(source), Some(target)) = (source, target) else {
                // The key references a table outside the inspected universe
                // (e.g. excluded by the subschema filter). Not an error.
                log::debug!(
                    "dropping foreign key '{}': '{}' or '{}' was not synthesized",
                    fk.constraint_name,
                    fk.source_table,
                    fk.target_table
                );
                continue;
            };

            let relation = BelongsTo {
                field: self.tables[target].base_name.clone(),
                alias_field: self.tables[target].entity_name.clone(),
                target_entity: self.tables[target].entity_name.clone(),
                source_column: fk.source_column,
                target_column: fk.target_column,
            };
            self.tables[source].entity.relations.push(relation);
        }
    }
}

/// Qualified name for a listed table under the normalized prefix, or `None`
/// when the table falls outside the requested subschema.
fn qualify(listed: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        Some(listed.to_string())
    } else if listed.contains(naming::SUBSCHEMA_SEPARATOR) {
        listed.starts_with(prefix).then(|| listed.to_string())
    } else {
        Some(format!("{}{}", prefix, listed))
    }
}

/// Pass-1 construction of one table descriptor and its entity.
fn build_table(
    inspector: &mut SchemaInspector<'_>,
    qualified_name: String,
) -> MapResult<TableDescriptor> {
    let base_name = naming::base_name(&qualified_name).to_string();
    let entity_name = naming::entity_name(&base_name);

    let columns = inspector.columns_of(&qualified_name)?;
    let primary_key = inspector.primary_key_of(&qualified_name)?;
    let foreign_keys = inspector.foreign_keys_of(&qualified_name)?;

    // Raw names are seeded first and always win; normalized aliases are
    // dropped on collision rather than shadowing an existing lookup.
    let mut column_aliases = BTreeMap::new();
    for (index, column) in columns.iter().enumerate() {
        column_aliases.insert(column.name.clone(), index);
    }
    for (index, column) in columns.iter().enumerate() {
        column_aliases
            .entry(naming::column_alias(column))
            .or_insert(index);
    }

    let attributes = column_aliases
        .iter()
        .map(|(alias, &index)| (alias.clone(), columns[index].name.clone()))
        .collect();

    let entity = Entity {
        name: entity_name.clone(),
        table: qualified_name.clone(),
        primary_key: primary_key.clone(),
        attributes,
        relations: Vec::new(),
    };

    Ok(TableDescriptor {
        qualified_name,
        base_name,
        entity_name,
        columns,
        primary_key,
        column_aliases,
        entity,
        foreign_keys,
    })
}
