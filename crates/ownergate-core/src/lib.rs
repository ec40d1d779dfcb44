//! ownergate core: ownership model, access decisions, and response decoration.
//!
//! This crate holds the engine that filters and decorates orchestration API
//! responses according to per-resource ownership records. It carries no
//! transport or runtime dependencies: it takes a fully buffered body and a
//! caller context, and hands back a replacement body or a denial.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Malformed upstream
//! bodies surface as `OwnerGateError` so the proxy never crashes on bad input.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod access;
pub mod body;
pub mod engine;
pub mod error;
pub mod item;

/// Shared result type.
pub use error::{OwnerGateError, Result};

pub use access::{CallerContext, InheritanceRule, OwnershipRecord, OwnershipSnapshot, ResourceType};
pub use engine::{InspectOutcome, ListLayout, Operation, ResourceKind, Rewrite};
