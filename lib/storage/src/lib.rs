//! # Geoff Storage
//!
//! Materializes parsed subgraphs into a graph store.
//!
//! - [`GraphStore`] - Interface the loader writes through
//! - [`MemoryStore`] - Thread-safe in-memory store
//! - [`Loader`] - Resolves hooks and creates nodes and relationships
//! - [`save_snapshot`] / [`load_snapshot`] - Atomic JSON persistence

pub mod error;
pub mod graph;
pub mod loader;
pub mod snapshot;
pub mod store;

pub use error::{Result, StoreError};
pub use graph::{EntityId, StoredNode, StoredRelationship};
pub use loader::{LoadReport, Loader, LoaderConfig};
pub use snapshot::{load_snapshot, open_or_create, save_snapshot, StoreSnapshot};
pub use store::{GraphStore, MemoryStore};
