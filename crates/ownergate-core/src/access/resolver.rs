//! Ownership lookup, direct or inherited from a labelled parent.
//!
//! Lookup rules:
//! - A record attached to the item itself always wins.
//! - Otherwise each inheritance rule is tried in order: the label value names
//!   the parent, looked up under the rule's parent type.
//! - Missing labels, empty or non-string label values, and missing parents
//!   all resolve to `None`. Nothing here fails.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::types::{OwnershipRecord, OwnershipSnapshot, ResourceType};

/// A child with no direct record may borrow the record of the parent named by
/// `label_key` (e.g. a stack namespace label pointing to a `Stack`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InheritanceRule {
    #[serde(rename = "label")]
    pub label_key: String,
    #[serde(rename = "parent")]
    pub parent_type: ResourceType,
}

impl InheritanceRule {
    pub fn new(label_key: impl Into<String>, parent_type: ResourceType) -> Self {
        Self {
            label_key: label_key.into(),
            parent_type,
        }
    }
}

/// Exact-match lookup on (resource id, resource type).
pub fn find_direct<'a>(
    resource_id: &str,
    resource_type: ResourceType,
    snapshot: &'a OwnershipSnapshot,
) -> Option<&'a OwnershipRecord> {
    snapshot.get(resource_id, resource_type)
}

/// Direct record for the item, else the first record inherited through `rules`.
pub fn find_effective<'a>(
    resource_id: &str,
    resource_type: ResourceType,
    labels: Option<&Map<String, Value>>,
    rules: &[InheritanceRule],
    snapshot: &'a OwnershipSnapshot,
) -> Option<&'a OwnershipRecord> {
    if let Some(rec) = find_direct(resource_id, resource_type, snapshot) {
        return Some(rec);
    }

    let labels = labels?;
    rules.iter().find_map(|rule| {
        let parent = labels.get(&rule.label_key)?.as_str()?;
        if parent.is_empty() {
            return None;
        }
        find_direct(parent, rule.parent_type, snapshot)
    })
}
