//! Identifier normalization for synthesized entities and attributes.
//!
//! Pure functions consulted during synthesis: column names become
//! lower-snake lookup aliases (booleans lose a leading `is_`), table base
//! names become singular PascalCase entity names, and subschema prefixes are
//! normalized to exactly one trailing separator.
//!
//! Date and time columns deliberately get no suffix or prefix treatment:
//! temporal naming conventions vary too much for a heuristic to be safe.

mod inflection;

use std::sync::LazyLock;

use inflector::Inflector;
use regex::Regex;

use crate::connection::ColumnDescriptor;

pub use inflection::{pluralize, singularize};

/// Separator between a subschema prefix and a table name, as in `dbo.Orders`.
pub const SUBSCHEMA_SEPARATOR: char = '.';

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());

/// Normalized lookup alias for a column.
///
/// Lower-snake-case of the raw name; boolean columns additionally lose one
/// leading `is_` segment, so `IsActive` and `Active` both alias to `active`.
/// Idempotent for non-boolean names that are already snake_case.
pub fn column_alias(column: &ColumnDescriptor) -> String {
    let snake = column.name.to_snake_case();
    if column.is_boolean() {
        if let Some(rest) = snake.strip_prefix("is_") {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    snake
}

/// Entity name for a table base name: `order_items` → `OrderItem`.
///
/// Non-identifier characters are scrubbed before snake-casing, then the name
/// is singularized and title-cased into a class-like identifier.
pub fn entity_name(base_name: &str) -> String {
    let scrubbed = NON_IDENTIFIER.replace_all(base_name, "_");
    let snake = scrubbed.to_snake_case();
    singularize(&snake).to_pascal_case()
}

/// Normalize a subschema prefix: exactly one trailing separator, never a
/// leading one. Empty input stays empty.
pub fn normalize_subschema(prefix: &str) -> String {
    let trimmed = prefix.trim_matches(SUBSCHEMA_SEPARATOR);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}{}", trimmed, SUBSCHEMA_SEPARATOR)
    }
}

/// The table name with any namespace prefix stripped.
pub fn base_name(qualified: &str) -> &str {
    qualified
        .rsplit(SUBSCHEMA_SEPARATOR)
        .next()
        .unwrap_or(qualified)
}

/// The namespace prefix of a qualified name, separator included; empty when
/// the name is unqualified.
pub fn namespace_prefix(qualified: &str) -> &str {
    match qualified.rfind(SUBSCHEMA_SEPARATOR) {
        Some(index) => &qualified[..=index],
        None => "",
    }
}
