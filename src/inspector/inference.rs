//! Heuristic foreign-key inference from column naming conventions.
//!
//! Used when an engine cannot report foreign keys natively. A column named
//! `user_id` (or `UserId`) is a candidate reference to a `users` or `user`
//! table in the same namespace; the candidate is accepted only when the
//! target's primary key is itself an id-style column or exactly matches the
//! source column name. Everything here is best-effort: a column that doesn't
//! match, or a candidate that fails validation, contributes nothing and
//! raises nothing.

use std::collections::HashSet;

use uuid::Uuid;

use crate::connection::{ForeignKeyDescriptor, ForeignKeyOrigin, PrimaryKey};
use crate::error::MapResult;
use crate::naming::{self, pluralize};

use super::SchemaInspector;

/// Suffixes that mark a column as an id-style reference. Case-sensitive.
const ID_SUFFIXES: &[&str] = &["_id", "Id"];

/// Primary-key names accepted as the target of an inferred reference.
const ID_PK_NAMES: &[&str] = &["id", "Id", "ID"];

impl SchemaInspector<'_> {
    /// Infer foreign keys for `table` from its column names.
    ///
    /// The candidate target keeps the source table's namespace prefix
    /// verbatim; references across subschemas are never inferred.
    pub(super) fn inferred_foreign_keys(
        &mut self,
        table: &str,
    ) -> MapResult<Vec<ForeignKeyDescriptor>> {
        let columns = self.columns_of(table)?;
        let known_tables: HashSet<String> = self.tables()?.into_iter().collect();
        let prefix = naming::namespace_prefix(table).to_string();

        let mut keys = Vec::new();
        for column in &columns {
            let Some(base) = strip_id_suffix(&column.name) else {
                continue;
            };

            let Some(target_table) = candidate_targets(base)
                .into_iter()
                .map(|candidate| format!("{}{}", prefix, candidate))
                .find(|qualified| known_tables.contains(qualified))
            else {
                continue;
            };

            let target_column = match self.primary_key_of(&target_table)? {
                PrimaryKey::Single(name) if accepts_target(&name, &column.name) => name,
                _ => continue,
            };

            log::debug!(
                "inferred foreign key {}.{} -> {}.{}",
                table,
                column.name,
                target_table,
                target_column
            );
            keys.push(ForeignKeyDescriptor {
                constraint_name: synthetic_constraint_name(),
                source_table: table.to_string(),
                source_column: column.name.clone(),
                target_table,
                target_column,
                origin: ForeignKeyOrigin::Inferred,
            });
        }
        Ok(keys)
    }
}

/// The column name with one id suffix stripped, if it carries one.
fn strip_id_suffix(name: &str) -> Option<&str> {
    ID_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .filter(|base| !base.is_empty())
}

/// Candidate target table names for a stripped column base, plural form
/// first (`user_id` → `users`, then `user`).
fn candidate_targets(base: &str) -> Vec<String> {
    let plural = pluralize(base);
    if plural == base {
        vec![plural]
    } else {
        vec![plural, base.to_string()]
    }
}

/// Whether a target primary-key name validates an inferred reference.
fn accepts_target(pk_name: &str, source_column: &str) -> bool {
    ID_PK_NAMES.contains(&pk_name) || pk_name == source_column
}

fn synthetic_constraint_name() -> String {
    format!("automap_fk_{}", Uuid::new_v4().simple())
}
