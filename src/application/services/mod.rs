//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `RecordStore` boundary trait
//! but are themselves concrete structs, not traits.

mod category;
mod directory;
mod rule_set;

pub use category::{CategoryChanges, CategoryDetails, CategoryService, NewCategory};
pub use directory::{DirectoryService, StaffMember};
pub use rule_set::RuleSetService;
