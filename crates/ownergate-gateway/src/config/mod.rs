//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use ownergate_core::error::{OwnerGateError, Result};

pub use schema::{CallerConfig, GatewayConfig, GatewaySection, KindConfig, OwnershipConfig};

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| OwnerGateError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| OwnerGateError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
