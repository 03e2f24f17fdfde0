//! Domain layer: the in-memory assembly hierarchy
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod component;
pub mod enums;
pub mod error;
pub mod factory;
pub mod fields;
pub mod tag;
pub mod tree;

pub use component::{Component, ComponentData, ComponentKind, EditMode, HardwareKind};
pub use enums::{ComponentType, Manufacture, Status};
pub use error::{DomainError, DomainResult};
pub use factory::ComponentFactory;
pub use fields::{FieldContainer, FieldKind, FieldSpec, FieldValue};
pub use tag::Tag;
pub use tree::{NodeId, Tree, TreeItem};
