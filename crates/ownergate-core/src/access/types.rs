//! Ownership records, the per-request snapshot, and the caller's grants.
//!
//! A snapshot holds at most one record per (resource id, resource type).

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{OwnerGateError, Result};

/// Kind of orchestration object an ownership record is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Container,
    Service,
    Volume,
    Network,
    Secret,
    Config,
    Stack,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Container => "container",
            ResourceType::Service => "service",
            ResourceType::Volume => "volume",
            ResourceType::Network => "network",
            ResourceType::Secret => "secret",
            ResourceType::Config => "config",
            ResourceType::Stack => "stack",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted grant describing who owns a resource, or that it is public.
///
/// The serialized form is what gets injected into decorated items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OwnershipRecord {
    #[serde(rename = "ResourceId")]
    pub resource_id: String,
    #[serde(rename = "Type")]
    pub resource_type: ResourceType,
    #[serde(rename = "UserAccesses", default)]
    pub owner_user_ids: BTreeSet<String>,
    #[serde(rename = "TeamAccesses", default)]
    pub owner_team_ids: BTreeSet<String>,
    #[serde(rename = "Public", default)]
    pub public: bool,
}

impl OwnershipRecord {
    /// Record with no owners and no public flag (only blanket access sees it).
    pub fn new(resource_id: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_type,
            owner_user_ids: BTreeSet::new(),
            owner_team_ids: BTreeSet::new(),
            public: false,
        }
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owner_user_ids.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn with_teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owner_team_ids.extend(teams.into_iter().map(Into::into));
        self
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

/// Immutable per-request set of ownership records, keyed by (type, id).
#[derive(Debug, Clone, Default)]
pub struct OwnershipSnapshot {
    records: HashMap<(ResourceType, String), OwnershipRecord>,
}

impl OwnershipSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot. Two records for the same (id, type) pair are rejected.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = OwnershipRecord>,
    {
        let mut map = HashMap::new();
        for rec in records {
            let key = (rec.resource_type, rec.resource_id.clone());
            if map.contains_key(&key) {
                return Err(OwnerGateError::BadRequest(format!(
                    "duplicate ownership record: {} {}",
                    rec.resource_type, rec.resource_id
                )));
            }
            map.insert(key, rec);
        }
        Ok(Self { records: map })
    }

    pub fn get(&self, resource_id: &str, resource_type: ResourceType) -> Option<&OwnershipRecord> {
        self.records.get(&(resource_type, resource_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Identity and grants of the caller for one proxied request.
/// Built by the authentication layer; the engine only reads it.
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub user_id: String,
    pub team_ids: BTreeSet<String>,
    pub is_admin: bool,
    /// Environment-scoped bypass; equivalent to admin for visibility.
    pub has_endpoint_access: bool,
    pub snapshot: Arc<OwnershipSnapshot>,
}

impl CallerContext {
    /// Restricted caller with no team memberships.
    pub fn user(user_id: impl Into<String>, snapshot: Arc<OwnershipSnapshot>) -> Self {
        Self {
            user_id: user_id.into(),
            team_ids: BTreeSet::new(),
            is_admin: false,
            has_endpoint_access: false,
            snapshot,
        }
    }

    pub fn with_teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.team_ids.extend(teams.into_iter().map(Into::into));
        self
    }

    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    pub fn endpoint_access(mut self) -> Self {
        self.has_endpoint_access = true;
        self
    }

    /// Admin or endpoint-level access: bypasses per-resource checks.
    pub fn has_blanket_access(&self) -> bool {
        self.is_admin || self.has_endpoint_access
    }
}
