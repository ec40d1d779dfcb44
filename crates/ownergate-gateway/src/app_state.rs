//! Shared application state for the ownergate gateway.
//!
//! Everything here is built once at startup and read-only afterwards,
//! except the atomic metrics.

use std::collections::HashMap;
use std::sync::Arc;

use ownergate_core::error::{OwnerGateError, Result};

use crate::config::GatewayConfig;
use crate::context::CallerIdentity;
use crate::obs::GatewayMetrics;
use crate::ownership::{OwnershipSource, StaticOwnershipSource};
use crate::registry::KindRegistry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<GatewayMetrics>,
}

struct AppStateInner {
    cfg: GatewayConfig,
    registry: KindRegistry,
    callers: HashMap<String, CallerIdentity>,
    ownership: Arc<dyn OwnershipSource>,
}

impl AppState {
    /// Build state with the static ownership source from config.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        let source = StaticOwnershipSource::from_config(&cfg.ownership)
            .map_err(|e| OwnerGateError::BadRequest(format!("ownership records invalid: {e}")))?;
        Self::with_ownership_source(cfg, Arc::new(source))
    }

    /// Build state around an externally provided ownership source.
    pub fn with_ownership_source(cfg: GatewayConfig, ownership: Arc<dyn OwnershipSource>) -> Result<Self> {
        let registry = KindRegistry::compile(&cfg.kinds, &cfg.gateway.decoration_field)
            .map_err(|e| OwnerGateError::BadRequest(format!("resource kinds compile failed: {e}")))?;

        let callers = cfg
            .callers
            .iter()
            .map(|c| (c.token.clone(), CallerIdentity::from(c)))
            .collect();

        tracing::info!(
            kinds = ?registry.names(),
            callers = cfg.callers.len(),
            ownership_source = ownership.name(),
            "gateway state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                callers,
                ownership,
            }),
            metrics: Arc::new(GatewayMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &KindRegistry {
        &self.inner.registry
    }

    pub fn ownership(&self) -> &dyn OwnershipSource {
        self.inner.ownership.as_ref()
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    /// Dev auth: static bearer tokens from config.
    pub fn resolve_token(&self, token: &str) -> Option<CallerIdentity> {
        self.inner.callers.get(token).cloned()
    }
}
