use crate::node::{merge_property_maps, Node, PropertyMap};
use crate::subgraph::NodeId;
use serde::Serialize;

/// A relationship as produced by the parser, still carrying its endpoint
/// nodes. Recording it in a [`Subgraph`](crate::Subgraph) resolves the
/// endpoints to handles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipSpec {
    pub start: Node,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertyMap>,
    pub end: Node,
}

impl RelationshipSpec {
    #[inline]
    #[must_use]
    pub fn new(
        start: Node,
        rel_type: impl Into<String>,
        properties: Option<PropertyMap>,
        end: Node,
    ) -> Self {
        Self {
            start,
            rel_type: rel_type.into(),
            properties,
            end,
        }
    }

    pub fn merge_properties(&mut self, properties: Option<PropertyMap>) {
        merge_property_maps(&mut self.properties, properties);
    }
}

/// A directed, typed edge stored in a subgraph
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    start: NodeId,
    end: NodeId,
    rel_type: String,
    properties: Option<PropertyMap>,
}

impl Relationship {
    pub(crate) fn new(
        start: NodeId,
        rel_type: String,
        properties: Option<PropertyMap>,
        end: NodeId,
    ) -> Self {
        Self {
            start,
            end,
            rel_type,
            properties,
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn rel_type(&self) -> &str {
        &self.rel_type
    }

    pub fn properties(&self) -> Option<&PropertyMap> {
        self.properties.as_ref()
    }
}
