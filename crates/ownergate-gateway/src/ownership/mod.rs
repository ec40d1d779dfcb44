//! Ownership snapshot sources.
//!
//! The engine consumes an immutable snapshot per request; where it comes
//! from (a database, a cache, static config) is behind `OwnershipSource`.

use std::sync::Arc;

use async_trait::async_trait;

use ownergate_core::error::Result;
use ownergate_core::OwnershipSnapshot;

use crate::config::OwnershipConfig;
use crate::context::CallerIdentity;

/// Produces the ownership snapshot for one proxied request.
#[async_trait]
pub trait OwnershipSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn snapshot(&self, caller: &CallerIdentity) -> Result<Arc<OwnershipSnapshot>>;
}

/// Records fixed at startup (from config); every request shares one snapshot.
pub struct StaticOwnershipSource {
    snapshot: Arc<OwnershipSnapshot>,
}

impl StaticOwnershipSource {
    pub fn new(snapshot: OwnershipSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }

    pub fn from_config(raw: &[OwnershipConfig]) -> Result<Self> {
        let snapshot = OwnershipSnapshot::from_records(raw.iter().map(OwnershipConfig::to_record))?;
        Ok(Self::new(snapshot))
    }
}

#[async_trait]
impl OwnershipSource for StaticOwnershipSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn snapshot(&self, _caller: &CallerIdentity) -> Result<Arc<OwnershipSnapshot>> {
        Ok(Arc::clone(&self.snapshot))
    }
}
