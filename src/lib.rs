//! # Geoff
//!
//! Parser and loader for Geoff, a text notation for describing graph
//! fragments: named and anonymous nodes, typed relationships, property
//! maps and hooks that bind a node to one already in a store.
//!
//! ## Quick Start
//!
//! ### As a Command
//!
//! ```bash
//! geoff validate people.geoff
//! geoff load --snapshot graph.json people.geoff
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use geoff::prelude::*;
//!
//! let text = r#"
//!     /* people */
//!     (alice:Person {"name":"Alice"})-[:KNOWS {"since":1999}]->(bob:Person)
//!     ~~~~
//!     :Person:name:=>(alice {"name":"Alice","age":33})
//! "#;
//!
//! let subgraphs = parse_document(text).unwrap();
//! assert_eq!(subgraphs.len(), 2);
//!
//! let store = MemoryStore::new();
//! let loader = Loader::new(&store);
//! for subgraph in &subgraphs {
//!     loader.load(subgraph).unwrap();
//! }
//!
//! // the hook matched alice instead of creating a third node
//! assert_eq!(store.node_count(), 2);
//! assert_eq!(store.relationship_count(), 1);
//! ```
//!
//! ## Crate Structure
//!
//! - [`geoff-core`](https://docs.rs/geoff-core) - Parser, values and the subgraph model
//! - [`geoff-storage`](https://docs.rs/geoff-storage) - Graph store, loader and snapshots

// Re-export core types
pub use geoff_core::{
    parse_document, read_document,
    Array, Error, Hook, Node, NodeId, ParseEvent, Parser, PropertyMap,
    Relationship, RelationshipSpec, Result, ScalarKind, Subgraph,
    SubgraphBuilder, SubgraphReader, Value,
};

// Re-export storage
pub use geoff_storage::{
    load_snapshot, open_or_create, save_snapshot,
    EntityId, GraphStore, LoadReport, Loader, LoaderConfig, MemoryStore,
    StoreError, StoreSnapshot, StoredNode, StoredRelationship,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        parse_document, read_document,
        Node, Relationship, Subgraph, SubgraphReader, Value,
        GraphStore, Loader, MemoryStore,
        Error, Result,
    };
}
