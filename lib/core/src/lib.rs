//! # Geoff Core
//!
//! Core library for the Geoff graph notation.
//!
//! This crate provides the parser and the in-memory subgraph model:
//!
//! - [`Parser`] - Pull parser yielding one [`ParseEvent`] per recognized element
//! - [`Subgraph`] - Deduplicated node arena plus ordered relationships
//! - [`Node`] / [`Relationship`] - Graph elements prior to materialization
//! - [`Value`] - JSON-compatible property values with homogeneous arrays
//! - [`SubgraphReader`] - Streaming reader, one subgraph per boundary section
//!
//! ## Example
//!
//! ```rust
//! use geoff_core::parse_document;
//!
//! let subgraphs = parse_document(
//!     "(alice:Person)-[:KNOWS]->(bob:Person) ~~~~ (carol)",
//! ).unwrap();
//!
//! assert_eq!(subgraphs.len(), 2);
//! assert_eq!(subgraphs[0].order(), 2);
//! assert_eq!(subgraphs[0].size(), 1);
//! assert!(subgraphs[1].get("carol").is_some());
//! ```

pub mod error;
pub mod event;
pub mod json;
pub mod node;
pub mod parser;
pub mod reader;
pub mod relationship;
pub mod scanner;
pub mod subgraph;
pub mod value;

pub use error::{Error, Result};
pub use event::ParseEvent;
pub use node::{Hook, Node, PropertyMap};
pub use parser::Parser;
pub use reader::{parse_document, read_document, SubgraphBuilder, SubgraphReader};
pub use relationship::{Relationship, RelationshipSpec};
pub use scanner::Scanner;
pub use subgraph::{NodeId, Subgraph};
pub use value::{Array, ScalarKind, Value};
