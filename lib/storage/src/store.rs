//! Graph store interface and the in-memory implementation
//!
//! A [`GraphStore`] is the collaborator a [`Loader`](crate::Loader)
//! materializes subgraphs into. Null property values are never stored.

use crate::error::{Result, StoreError};
use crate::graph::{EntityId, StoredNode, StoredRelationship};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub trait GraphStore {
    /// First node carrying `label` and, when given, the property `key`
    /// equal to `value`
    fn find_node(&self, label: &str, key: Option<(&str, &serde_json::Value)>) -> Option<EntityId>;

    fn create_node(&self) -> EntityId;

    fn add_label(&self, node: EntityId, label: &str) -> Result<()>;

    /// Set a node property; a null value removes the key
    fn set_node_property(&self, node: EntityId, key: &str, value: serde_json::Value) -> Result<()>;

    fn create_relationship(&self, start: EntityId, rel_type: &str, end: EntityId) -> Result<EntityId>;

    /// Set a relationship property; a null value removes the key
    fn set_relationship_property(
        &self,
        rel: EntityId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    pub next_node_id: EntityId,
    pub next_relationship_id: EntityId,
    pub nodes: BTreeMap<EntityId, StoredNode>,
    pub relationships: BTreeMap<EntityId, StoredRelationship>,
}

/// Thread-safe in-memory graph store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub(crate) fn state_snapshot(&self) -> StoreState {
        self.state.read().clone()
    }

    pub fn node_count(&self) -> usize {
        self.state.read().nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.state.read().relationships.len()
    }

    pub fn node(&self, id: EntityId) -> Option<StoredNode> {
        self.state.read().nodes.get(&id).cloned()
    }

    pub fn relationship(&self, id: EntityId) -> Option<StoredRelationship> {
        self.state.read().relationships.get(&id).cloned()
    }

    /// All nodes in id order
    pub fn nodes(&self) -> Vec<StoredNode> {
        self.state.read().nodes.values().cloned().collect()
    }

    /// All relationships in id order
    pub fn relationships(&self) -> Vec<StoredRelationship> {
        self.state.read().relationships.values().cloned().collect()
    }

    pub fn nodes_with_label(&self, label: &str) -> Vec<EntityId> {
        self.state
            .read()
            .nodes
            .values()
            .filter(|n| n.has_label(label))
            .map(|n| n.id)
            .collect()
    }
}

fn apply_property(
    properties: &mut BTreeMap<String, serde_json::Value>,
    key: &str,
    value: serde_json::Value,
) {
    if value.is_null() {
        properties.remove(key);
    } else {
        properties.insert(key.to_string(), value);
    }
}

impl GraphStore for MemoryStore {
    fn find_node(&self, label: &str, key: Option<(&str, &serde_json::Value)>) -> Option<EntityId> {
        let state = self.state.read();
        state
            .nodes
            .values()
            .find(|node| {
                node.has_label(label)
                    && key.map_or(true, |(key, value)| node.properties.get(key) == Some(value))
            })
            .map(|node| node.id)
    }

    fn create_node(&self) -> EntityId {
        let mut state = self.state.write();
        let id = state.next_node_id;
        state.next_node_id += 1;
        state.nodes.insert(id, StoredNode::new(id));
        id
    }

    fn add_label(&self, node: EntityId, label: &str) -> Result<()> {
        let mut state = self.state.write();
        let node = state
            .nodes
            .get_mut(&node)
            .ok_or(StoreError::NodeNotFound(node))?;
        node.labels.insert(label.to_string());
        Ok(())
    }

    fn set_node_property(&self, node: EntityId, key: &str, value: serde_json::Value) -> Result<()> {
        let mut state = self.state.write();
        let node = state
            .nodes
            .get_mut(&node)
            .ok_or(StoreError::NodeNotFound(node))?;
        apply_property(&mut node.properties, key, value);
        Ok(())
    }

    fn create_relationship(&self, start: EntityId, rel_type: &str, end: EntityId) -> Result<EntityId> {
        let mut state = self.state.write();
        for endpoint in [start, end] {
            if !state.nodes.contains_key(&endpoint) {
                return Err(StoreError::NodeNotFound(endpoint));
            }
        }
        let id = state.next_relationship_id;
        state.next_relationship_id += 1;
        state
            .relationships
            .insert(id, StoredRelationship::new(id, start, rel_type, end));
        Ok(id)
    }

    fn set_relationship_property(
        &self,
        rel: EntityId,
        key: &str,
        value: serde_json::Value,
    ) -> Result<()> {
        let mut state = self.state.write();
        let rel = state
            .relationships
            .get_mut(&rel)
            .ok_or(StoreError::RelationshipNotFound(rel))?;
        apply_property(&mut rel.properties, key, value);
        Ok(())
    }
}
