//! Subgraph accumulator
//!
//! Nodes live in an insertion-ordered arena and are addressed by
//! [`NodeId`]. A name index keeps node identity unique, so recording a
//! node whose name is already present merges into the existing entry
//! instead of adding a second one. Relationships refer to their
//! endpoints by handle and are kept in construction order.

use crate::node::{write_name, write_properties, Node};
use crate::relationship::{Relationship, RelationshipSpec};
use ahash::AHashMap;
use serde_json::json;
use std::fmt;
use std::ops::Index;

/// Stable handle of a node within one subgraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in insertion order
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    nodes: Vec<Node>,
    // Keyed by node name. Unnamed nodes are indexed under their synthetic
    // name so that a placeholder reused within one statement stays one node.
    index: AHashMap<String, NodeId>,
    relationships: Vec<Relationship>,
    comments: Vec<String>,
}

impl Subgraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes
    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// Number of relationships
    pub fn size(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.relationships.is_empty()
    }

    /// Record a node, merging it into an existing node of the same name
    pub fn merge_node(&mut self, node: Node) -> NodeId {
        if let Some(&id) = self.index.get(node.name()) {
            self.nodes[id.0].merge(node);
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(node.name().to_string(), id);
        self.nodes.push(node);
        id
    }

    /// Record a relationship, merging both endpoints first
    pub fn add_relationship(&mut self, spec: RelationshipSpec) -> &Relationship {
        let RelationshipSpec {
            start,
            rel_type,
            properties,
            end,
        } = spec;
        let start = self.merge_node(start);
        let end = self.merge_node(end);
        self.relationships
            .push(Relationship::new(start, rel_type, properties, end));
        &self.relationships[self.relationships.len() - 1]
    }

    /// Record a node and bind a hook to it
    pub fn set_hook(&mut self, node: Node, label: String, key: Option<String>) -> NodeId {
        let id = self.merge_node(node);
        self.nodes[id.0].set_hook(label, key);
        id
    }

    pub fn add_comment(&mut self, comment: String) {
        self.comments.push(comment);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node by name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.id_of(name).map(|id| &self.nodes[id.0])
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Nodes whose names came from the source text
    pub fn named_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|n| n.is_named())
    }

    pub fn hooked_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(|n| n.hook().is_some())
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// JSON view with relationship endpoints given by node name
    pub fn to_json(&self) -> serde_json::Value {
        let relationships: Vec<serde_json::Value> = self
            .relationships
            .iter()
            .map(|rel| {
                let mut value = json!({
                    "start": self[rel.start()].name(),
                    "type": rel.rel_type(),
                    "end": self[rel.end()].name(),
                });
                if let Some(properties) = rel.properties() {
                    value["properties"] = json!(properties);
                }
                value
            })
            .collect();
        json!({
            "nodes": self.nodes,
            "relationships": relationships,
            "comments": self.comments,
        })
    }
}

impl Index<NodeId> for Subgraph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Renders the subgraph as Geoff, one element per line
impl fmt::Display for Subgraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut separate = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            Ok(())
        };

        for comment in &self.comments {
            separate(f)?;
            write!(f, "/* {} */", comment)?;
        }
        // Unnamed nodes are written as `()`. One used by a single
        // relationship end is written inline there; one shared between
        // several ends keeps its synthetic name so the ends stay joined.
        let mut uses = vec![0usize; self.nodes.len()];
        for rel in &self.relationships {
            uses[rel.start().0] += 1;
            uses[rel.end().0] += 1;
        }
        let inline = |id: NodeId| {
            let node = &self[id];
            !node.is_named() && node.hook().is_none() && uses[id.0] == 1
        };

        for (id, node) in self.nodes() {
            if inline(id) {
                continue;
            }
            separate(f)?;
            node.write_geoff(f, node.is_named() || uses[id.0] > 0)?;
        }
        let write_end = |f: &mut fmt::Formatter<'_>, id: NodeId| -> fmt::Result {
            if inline(id) {
                self[id].write_geoff(f, false)
            } else {
                f.write_str("(")?;
                write_name(f, self[id].name())?;
                f.write_str(")")
            }
        };
        for rel in &self.relationships {
            separate(f)?;
            write_end(f, rel.start())?;
            f.write_str("-[:")?;
            write_name(f, rel.rel_type())?;
            if let Some(properties) = rel.properties() {
                f.write_str(" ")?;
                write_properties(f, properties)?;
            }
            f.write_str("]->")?;
            write_end(f, rel.end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_merge_node_deduplicates_by_name() {
        let mut subgraph = Subgraph::new();
        let a = subgraph.merge_node(Node::named("a").with_property("x", 1));
        let b = subgraph.merge_node(Node::named("a").with_property("x", 1));
        assert_eq!(a, b);
        assert_eq!(subgraph.order(), 1);
        assert_eq!(subgraph.get("a").unwrap().property("x"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_label_union() {
        let mut subgraph = Subgraph::new();
        subgraph.merge_node(Node::named("a").with_label("Foo"));
        subgraph.merge_node(Node::named("a").with_label("Bar"));
        let node = subgraph.get("a").unwrap();
        assert!(node.has_label("Foo"));
        assert!(node.has_label("Bar"));
        assert_eq!(node.labels().unwrap().len(), 2);
    }

    #[test]
    fn test_add_relationship_records_endpoints() {
        let mut subgraph = Subgraph::new();
        let rel = subgraph
            .add_relationship(RelationshipSpec::new(
                Node::named("alice"),
                "KNOWS",
                None,
                Node::named("bob"),
            ))
            .clone();
        assert_eq!(subgraph.order(), 2);
        assert_eq!(subgraph.size(), 1);
        assert_eq!(subgraph[rel.start()].name(), "alice");
        assert_eq!(subgraph[rel.end()].name(), "bob");
        assert_eq!(rel.rel_type(), "KNOWS");
    }

    #[test]
    fn test_anonymous_nodes_are_distinct() {
        let mut subgraph = Subgraph::new();
        subgraph.merge_node(Node::anonymous());
        subgraph.merge_node(Node::anonymous());
        assert_eq!(subgraph.order(), 2);
        assert_eq!(subgraph.named_nodes().count(), 0);
    }

    #[test]
    fn test_set_hook_on_existing_node() {
        let mut subgraph = Subgraph::new();
        subgraph.merge_node(Node::named("a").with_property("email", "a@example.com"));
        subgraph.set_hook(Node::named("a"), "Person".to_string(), Some("email".to_string()));
        let node = subgraph.get("a").unwrap();
        assert_eq!(node.property("email"), Some(&Value::from("a@example.com")));
        assert_eq!(subgraph.hooked_nodes().count(), 1);
    }

    #[test]
    fn test_display_writes_unnamed_nodes_without_names() {
        let mut subgraph = Subgraph::new();
        subgraph.merge_node(Node::anonymous().with_label("Tag"));
        subgraph.add_relationship(RelationshipSpec::new(
            Node::anonymous().with_property("x", 1),
            "OWNS",
            None,
            Node::named("bob"),
        ));
        assert_eq!(
            subgraph.to_string(),
            "(:Tag)\n(bob)\n({\"x\":1})-[:OWNS]->(bob)"
        );
    }

    #[test]
    fn test_display_keeps_shared_unnamed_node_joined() {
        let mut subgraph = Subgraph::new();
        let middle = Node::anonymous();
        subgraph.add_relationship(RelationshipSpec::new(
            Node::named("a"),
            "X",
            None,
            middle.clone(),
        ));
        subgraph.add_relationship(RelationshipSpec::new(middle.clone(), "Y", None, Node::named("b")));
        let text = subgraph.to_string();
        assert!(text.contains(&format!("(\"{}\")", middle.name())));
    }

    #[test]
    fn test_display_and_json() {
        let mut subgraph = Subgraph::new();
        subgraph.add_comment("people".to_string());
        subgraph.add_relationship(RelationshipSpec::new(
            Node::named("alice"),
            "KNOWS",
            Some([("since".to_string(), Value::Integer(1999))].into_iter().collect()),
            Node::named("bob"),
        ));
        assert_eq!(
            subgraph.to_string(),
            "/* people */\n(alice)\n(bob)\n(alice)-[:KNOWS {\"since\":1999}]->(bob)"
        );

        let json = subgraph.to_json();
        assert_eq!(json["nodes"][0]["name"], "alice");
        assert_eq!(json["relationships"][0]["start"], "alice");
        assert_eq!(json["relationships"][0]["type"], "KNOWS");
        assert_eq!(json["relationships"][0]["properties"]["since"], 1999);
        assert_eq!(json["comments"][0], "people");
    }
}
