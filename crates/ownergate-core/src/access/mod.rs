//! Ownership model and access decisions.
//!
//! - `types`: records, snapshot, caller context
//! - `evaluator`: the per-record grant check
//! - `resolver`: direct and label-inherited record lookup

pub mod evaluator;
pub mod resolver;
pub mod types;

pub use evaluator::can_access;
pub use resolver::{find_direct, find_effective, InheritanceRule};
pub use types::{CallerContext, OwnershipRecord, OwnershipSnapshot, ResourceType};
