//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent structural or data-model violations.
/// Every failing operation leaves the tree exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node does not belong to this tree: {0}")]
    InvalidChildType(String),

    #[error("leaf node can't have children: {0}")]
    LeafViolation(String),

    #[error("root node can't have a parent: {0}")]
    RootViolation(String),

    #[error("node is not in the children list: {0}")]
    ChildNotFound(String),

    #[error("position {index} out of bound (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("node has no children: {0}")]
    EmptyNode(String),

    #[error("field doesn't exist in container: {0}")]
    UnknownField(String),

    #[error("unknown component type: {0:?}")]
    UnknownComponentType(String),

    #[error("cycle detected in hierarchy: {0}")]
    CycleDetected(String),

    #[error("node already has a parent: {0}")]
    AlreadyAttached(String),

    #[error("invalid tag: {0:?}")]
    InvalidTag(String),

    #[error("tag increment out of range: {tag} + {quantity}")]
    TagOverflow { tag: String, quantity: i64 },

    #[error("invalid value for field {field}: {value:?}")]
    InvalidFieldValue { field: String, value: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
