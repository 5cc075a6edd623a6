use crate::node::Node;
use crate::relationship::RelationshipSpec;

/// One recognized element of a Geoff document
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// A lone node statement, with any trailing property map applied
    Node(Node),
    /// One resolved direction of a relationship chain
    Relationship(RelationshipSpec),
    /// `:Label:key:=>(node)` or `:Label:=>(node)`
    Hook {
        node: Node,
        label: String,
        key: Option<String>,
    },
    /// Trimmed comment text
    Comment(String),
    /// End of the current subgraph
    Boundary,
}
