use crate::scanner::is_name_char;
use crate::value::Value;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

pub type PropertyMap = BTreeMap<String, Value>;

/// Merge point against an external store: find or create a node carrying
/// `label` and, when present, property `key` equal to this node's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hook {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// A graph vertex prior to materialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    name: String,
    named: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<PropertyMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hook: Option<Hook>,
}

impl Node {
    /// Create a node; a missing name is replaced by a fresh synthetic one
    /// and the node is marked unnamed.
    pub fn new(
        name: Option<String>,
        labels: Option<BTreeSet<String>>,
        properties: Option<PropertyMap>,
    ) -> Self {
        let (name, named) = match name {
            Some(name) => (name, true),
            None => (Uuid::new_v4().to_string(), false),
        };
        Self {
            name,
            named,
            labels,
            properties,
            hook: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(Some(name.into()), None, None)
    }

    #[inline]
    #[must_use]
    pub fn anonymous() -> Self {
        Self::new(None, None, None)
    }

    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.get_or_insert_with(BTreeSet::new).insert(label.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(PropertyMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the name came from the source text rather than being synthetic
    pub fn is_named(&self) -> bool {
        self.named
    }

    pub fn labels(&self) -> Option<&BTreeSet<String>> {
        self.labels.as_ref()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.as_ref().is_some_and(|labels| labels.contains(label))
    }

    pub fn properties(&self) -> Option<&PropertyMap> {
        self.properties.as_ref()
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    pub fn hook(&self) -> Option<&Hook> {
        self.hook.as_ref()
    }

    /// Fold another definition of this node into it
    pub fn merge(&mut self, other: Node) {
        self.named |= other.named;
        self.merge_labels(other.labels);
        self.merge_properties(other.properties);
        if other.hook.is_some() {
            self.hook = other.hook;
        }
    }

    pub fn merge_labels(&mut self, labels: Option<BTreeSet<String>>) {
        if let Some(labels) = labels {
            self.labels.get_or_insert_with(BTreeSet::new).extend(labels);
        }
    }

    pub fn merge_properties(&mut self, properties: Option<PropertyMap>) {
        merge_property_maps(&mut self.properties, properties);
    }

    /// Mark this node as a hook. The label joins the label set and an
    /// absent key is reserved with a null value.
    pub fn set_hook(&mut self, label: impl Into<String>, key: Option<String>) {
        let label = label.into();
        self.labels
            .get_or_insert_with(BTreeSet::new)
            .insert(label.clone());
        if let Some(key) = &key {
            self.properties
                .get_or_insert_with(PropertyMap::new)
                .entry(key.clone())
                .or_insert(Value::Null);
        }
        self.hook = Some(Hook { label, key });
    }
}

/// Key-by-key merge: last write wins, but an incoming null never erases
/// an existing non-null value.
pub(crate) fn merge_property_maps(target: &mut Option<PropertyMap>, incoming: Option<PropertyMap>) {
    let Some(incoming) = incoming else {
        return;
    };
    let target = target.get_or_insert_with(PropertyMap::new);
    for (key, value) in incoming {
        if value.is_null() && target.get(&key).is_some_and(|v| !v.is_null()) {
            continue;
        }
        target.insert(key, value);
    }
}

/// Write a name bare when possible, otherwise as a JSON string
pub(crate) fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if !name.is_empty() && name.chars().all(is_name_char) {
        f.write_str(name)
    } else {
        let quoted = serde_json::to_string(name).map_err(|_| fmt::Error)?;
        f.write_str(&quoted)
    }
}

pub(crate) fn write_properties(f: &mut fmt::Formatter<'_>, properties: &PropertyMap) -> fmt::Result {
    let json = serde_json::to_string(properties).map_err(|_| fmt::Error)?;
    f.write_str(&json)
}

impl Node {
    /// Render as Geoff. Without the name the node re-parses as a fresh
    /// unnamed node.
    pub(crate) fn write_geoff(&self, f: &mut fmt::Formatter<'_>, with_name: bool) -> fmt::Result {
        if let Some(hook) = &self.hook {
            f.write_str(":")?;
            write_name(f, &hook.label)?;
            f.write_str(":")?;
            if let Some(key) = &hook.key {
                write_name(f, key)?;
                f.write_str(":")?;
            }
            f.write_str("=>")?;
        }
        f.write_str("(")?;
        let mut written = false;
        if with_name {
            write_name(f, &self.name)?;
            written = true;
        }
        if let Some(labels) = &self.labels {
            for label in labels {
                f.write_str(":")?;
                write_name(f, label)?;
                written = true;
            }
        }
        if let Some(properties) = &self.properties {
            if written {
                f.write_str(" ")?;
            }
            write_properties(f, properties)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_geoff(f, self.named)
    }
}
