//! Top-level facade crate for ownergate.
//!
//! Re-exports the decoration engine and the gateway integration so users can depend on a single crate.

pub mod core {
    pub use ownergate_core::*;
}

pub mod gateway {
    pub use ownergate_gateway::*;
}
