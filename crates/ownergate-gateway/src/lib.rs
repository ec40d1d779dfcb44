//! ownergate gateway library entry.
//!
//! Wires config, the resource-kind registry, caller authentication, the
//! ownership source, and the response rewrite layer around the core engine.
//! Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod context;
pub mod obs;
pub mod ops;
pub mod ownership;
pub mod registry;
pub mod rewrite;
pub mod router;
