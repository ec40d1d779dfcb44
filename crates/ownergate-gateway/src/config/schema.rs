use std::collections::HashSet;

use serde::Deserialize;
use ownergate_core::error::{OwnerGateError, Result};
use ownergate_core::{InheritanceRule, OwnershipRecord, ResourceType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    /// Resource kinds to intercept. Empty means the built-in Docker set.
    #[serde(default)]
    pub kinds: Vec<KindConfig>,

    /// Static bearer-token callers (dev auth).
    #[serde(default)]
    pub callers: Vec<CallerConfig>,

    /// Static ownership records served by the default ownership source.
    #[serde(default)]
    pub ownership: Vec<OwnershipConfig>,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(OwnerGateError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.gateway.validate()?;

        let mut names = HashSet::new();
        for k in &self.kinds {
            k.validate()?;
            if !names.insert(k.name.as_str()) {
                return Err(OwnerGateError::BadRequest(format!("duplicate kind name: {}", k.name)));
            }
        }

        let mut tokens = HashSet::new();
        for c in &self.callers {
            if c.token.is_empty() || c.user_id.is_empty() {
                return Err(OwnerGateError::BadRequest(
                    "callers[].token and callers[].user_id must not be empty".into(),
                ));
            }
            if !tokens.insert(c.token.as_str()) {
                return Err(OwnerGateError::BadRequest(format!(
                    "duplicate caller token for user {}",
                    c.user_id
                )));
            }
        }

        for o in &self.ownership {
            if o.resource_id.is_empty() {
                return Err(OwnerGateError::BadRequest(
                    "ownership[].resource_id must not be empty".into(),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Upper bound for buffering an upstream body before rewriting it.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Reserved item field that receives ownership metadata.
    #[serde(default = "default_decoration_field")]
    pub decoration_field: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
            decoration_field: default_decoration_field(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        if !(1024..=67_108_864).contains(&self.max_body_bytes) {
            return Err(OwnerGateError::BadRequest(
                "gateway.max_body_bytes must be between 1024 and 67108864".into(),
            ));
        }
        if self.decoration_field.is_empty() {
            return Err(OwnerGateError::BadRequest(
                "gateway.decoration_field must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:9000".into()
}
fn default_max_body_bytes() -> usize {
    8 * 1024 * 1024
}
fn default_decoration_field() -> String {
    ownergate_core::engine::DEFAULT_DECORATION_FIELD.into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KindConfig {
    pub name: String,
    pub resource_type: ResourceType,
    pub identifier_field: String,

    /// GET path of the collection endpoint, e.g. `/volumes`.
    pub list_path: String,
    /// GET path of the single-object endpoint; `{id}` marks the identifier segment.
    pub inspect_path: String,

    /// Array field holding list items. None => body is the array itself.
    #[serde(default)]
    pub list_field: Option<String>,

    /// Dotted path to the labels object in list items.
    #[serde(default = "default_labels_field")]
    pub labels_field: String,
    /// Labels path in inspect bodies when it differs from list items.
    #[serde(default)]
    pub inspect_labels_field: Option<String>,

    #[serde(default)]
    pub inherit: Vec<InheritanceRule>,
}

impl KindConfig {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.identifier_field.is_empty() || self.labels_field.is_empty() {
            return Err(OwnerGateError::BadRequest(format!(
                "kind `{}`: name, identifier_field and labels_field must not be empty",
                self.name
            )));
        }
        if matches!(&self.list_field, Some(f) if f.is_empty()) {
            return Err(OwnerGateError::BadRequest(format!(
                "kind `{}`: list_field must not be empty when set",
                self.name
            )));
        }
        for rule in &self.inherit {
            if rule.label_key.is_empty() {
                return Err(OwnerGateError::BadRequest(format!(
                    "kind `{}`: inherit[].label must not be empty",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

fn default_labels_field() -> String {
    "Labels".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallerConfig {
    pub token: String,
    pub user_id: String,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub endpoint_access: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnershipConfig {
    pub resource_id: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(default)]
    pub public: bool,
}

impl OwnershipConfig {
    pub fn to_record(&self) -> OwnershipRecord {
        let rec = OwnershipRecord::new(self.resource_id.clone(), self.resource_type)
            .with_users(self.users.iter().cloned())
            .with_teams(self.teams.iter().cloned());
        if self.public {
            rec.public()
        } else {
            rec
        }
    }
}
