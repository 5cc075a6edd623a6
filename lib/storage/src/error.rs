use crate::graph::EntityId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Node not found: {0}")]
    NodeNotFound(EntityId),

    #[error("Relationship not found: {0}")]
    RelationshipNotFound(EntityId),
}
