// Stored graph records - nodes and relationships as held by a store
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type EntityId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    pub id: EntityId,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRelationship {
    pub id: EntityId,
    pub start: EntityId,
    pub end: EntityId,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl StoredNode {
    #[inline]
    #[must_use]
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            labels: BTreeSet::new(),
            properties: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.insert(label.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

impl StoredRelationship {
    #[inline]
    #[must_use]
    pub fn new(id: EntityId, start: EntityId, rel_type: impl Into<String>, end: EntityId) -> Self {
        Self {
            id,
            start,
            end,
            rel_type: rel_type.into(),
            properties: BTreeMap::new(),
        }
    }
}
