//! Application layer: the addressable view over the component tree

pub mod error;
pub mod model;

pub use error::{ApplicationError, ApplicationResult};
pub use model::{Address, ComponentModel, ModelObserver};
