//! String inflection for table and entity naming.
//!
//! Wraps the `inflector` crate with the irregular plurals that actually show
//! up in database schemas, so `people` maps to a `Person` entity and a
//! `person_id` column can find a `people` table.

use inflector::Inflector;

/// Irregular plurals inflector mishandles in database contexts.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("status", "statuses"),
    ("address", "addresses"),
    ("category", "categories"),
    ("company", "companies"),
    ("index", "indices"),
    ("datum", "data"),
    ("medium", "media"),
];

/// Singularize a word, irregulars first, then the inflector rules.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *plural || lower == *singular {
            return (*singular).to_string();
        }
    }

    word.to_singular()
}

/// Pluralize a word, irregulars first, then the inflector rules.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *singular || lower == *plural {
            return (*plural).to_string();
        }
    }

    word.to_plural()
}
