//! The registration sink: exposing synthesized entities under names.
//!
//! Synthesis never registers anything itself; callers hand the returned map
//! to a [`Registrar`]. The in-memory [`NamespaceTree`] covers tests and
//! embedders without a host namespace of their own.

use std::collections::BTreeMap;

use crate::error::RegistryError;

use super::entity::Entity;

/// A sink that exposes entity types under names within namespaces.
///
/// Registration is idempotent for the same entity under the same name;
/// missing intermediate namespace segments are created; a different entity
/// under an existing name fails with [`RegistryError::NameCollision`].
pub trait Registrar {
    fn register(
        &mut self,
        entity: &Entity,
        name: &str,
        namespace: &[&str],
    ) -> Result<(), RegistryError>;
}

/// In-memory namespace tree implementing [`Registrar`].
#[derive(Debug, Default)]
pub struct NamespaceTree {
    root: NamespaceNode,
}

#[derive(Debug, Default)]
struct NamespaceNode {
    children: BTreeMap<String, NamespaceNode>,
    entities: BTreeMap<String, Entity>,
}

impl NamespaceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a registered entity by namespace path and name.
    pub fn resolve(&self, namespace: &[&str], name: &str) -> Option<&Entity> {
        let mut node = &self.root;
        for segment in namespace {
            node = node.children.get(*segment)?;
        }
        node.entities.get(name)
    }

    /// Whether a namespace path exists, even if empty.
    pub fn has_namespace(&self, namespace: &[&str]) -> bool {
        let mut node = &self.root;
        for segment in namespace {
            match node.children.get(*segment) {
                Some(child) => node = child,
                None => return false,
            }
        }
        true
    }
}

impl Registrar for NamespaceTree {
    fn register(
        &mut self,
        entity: &Entity,
        name: &str,
        namespace: &[&str],
    ) -> Result<(), RegistryError> {
        let mut node = &mut self.root;
        for segment in namespace {
            node = node.children.entry((*segment).to_string()).or_default();
        }

        match node.entities.get(name) {
            Some(existing) if existing == entity => Ok(()),
            Some(_) => Err(RegistryError::NameCollision {
                name: name.to_string(),
                namespace: namespace.join("."),
            }),
            None => {
                node.entities.insert(name.to_string(), entity.clone());
                Ok(())
            }
        }
    }
}
