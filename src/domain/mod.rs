//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod combinator;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod operation;
pub mod validation;

pub use arena::{CategoryNode, CategoryTree};
pub use builder::TreeBuilder;
pub use combinator::{datatype_label, render, CombinedPath, Combinator, OutcomeLookup};
pub use dataset::Dataset;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use operation::{Datatype, Operation, ParseEnumError};
pub use validation::{FieldError, ValidationErrors};
