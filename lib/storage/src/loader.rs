use crate::error::Result;
use crate::graph::EntityId;
use crate::store::GraphStore;
use geoff_core::{Hook, Node, PropertyMap, Subgraph};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

/// Configuration for loading subgraphs
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Look hooked nodes up in the store before creating them
    pub resolve_hooks: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            resolve_hooks: true,
        }
    }
}

/// Outcome of loading one subgraph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Store id of every named node, keyed by name
    pub named: BTreeMap<String, EntityId>,
    pub nodes_created: usize,
    pub nodes_matched: usize,
    pub relationships_created: usize,
}

/// Materializes subgraphs into a [`GraphStore`]
pub struct Loader<'s, S: GraphStore + ?Sized> {
    store: &'s S,
    config: LoaderConfig,
}

impl<'s, S: GraphStore + ?Sized> Loader<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self::with_config(store, LoaderConfig::default())
    }

    pub fn with_config(store: &'s S, config: LoaderConfig) -> Self {
        Self { store, config }
    }

    /// Load a subgraph.
    ///
    /// Nodes are resolved first (hooked nodes are found or created, all
    /// others created), then relationships are created between the
    /// resolved endpoints.
    pub fn load(&self, subgraph: &Subgraph) -> Result<LoadReport> {
        info!(order = subgraph.order(), size = subgraph.size(), "Loading subgraph");
        let started = Instant::now();
        let mut report = LoadReport::default();

        // indexed by NodeId::index()
        let mut resolved = Vec::with_capacity(subgraph.order());
        for (_, node) in subgraph.nodes() {
            let (id, matched) = self.create_or_update_node(node)?;
            if matched {
                report.nodes_matched += 1;
            } else {
                report.nodes_created += 1;
            }
            if node.is_named() {
                report.named.insert(node.name().to_string(), id);
            }
            resolved.push(id);
        }

        for rel in subgraph.relationships() {
            let start = resolved[rel.start().index()];
            let end = resolved[rel.end().index()];
            let id = self.store.create_relationship(start, rel.rel_type(), end)?;
            self.write_properties(rel.properties(), |key, value| {
                self.store.set_relationship_property(id, key, value)
            })?;
            report.relationships_created += 1;
        }

        info!(
            nodes = resolved.len(),
            matched = report.nodes_matched,
            relationships = report.relationships_created,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded subgraph"
        );
        Ok(report)
    }

    /// Returns the store id and whether an existing node was matched
    fn create_or_update_node(&self, node: &Node) -> Result<(EntityId, bool)> {
        let found = match node.hook() {
            Some(hook) if self.config.resolve_hooks => self.find_hooked(node, hook),
            _ => None,
        };
        let (id, matched) = match found {
            Some(id) => (id, true),
            None => (self.store.create_node(), false),
        };

        if let Some(labels) = node.labels() {
            for label in labels {
                self.store.add_label(id, label)?;
            }
        }
        self.write_properties(node.properties(), |key, value| {
            self.store.set_node_property(id, key, value)
        })?;
        Ok((id, matched))
    }

    fn find_hooked(&self, node: &Node, hook: &Hook) -> Option<EntityId> {
        let Some(key) = &hook.key else {
            return self.store.find_node(&hook.label, None);
        };
        let value = node
            .property(key)
            .map(serde_json::Value::from)
            .unwrap_or(serde_json::Value::Null);
        if value.is_null() {
            // null is never stored, so nothing can match
            debug!(node = node.name(), label = %hook.label, key = %key, "Hook value is null");
            return None;
        }
        self.store.find_node(&hook.label, Some((key.as_str(), &value)))
    }

    // Values that convert to null (hook placeholders) are skipped so they
    // never remove a stored key
    fn write_properties(
        &self,
        properties: Option<&PropertyMap>,
        mut set: impl FnMut(&str, serde_json::Value) -> Result<()>,
    ) -> Result<()> {
        let Some(properties) = properties else {
            return Ok(());
        };
        for (key, value) in properties {
            let value = serde_json::Value::from(value);
            if !value.is_null() {
                set(key.as_str(), value)?;
            }
        }
        Ok(())
    }
}
