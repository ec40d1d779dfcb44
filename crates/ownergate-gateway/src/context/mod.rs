//! Per-request caller context shared across layers.
//!
//! The authentication layer resolves a `CallerIdentity` and stores it as a
//! request extension; the rewrite layer pairs it with an ownership snapshot
//! to build the engine's `CallerContext`.

pub mod caller;

pub use caller::{authenticate, CallerIdentity};
