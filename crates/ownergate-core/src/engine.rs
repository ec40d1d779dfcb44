//! Decoration/filter engine.
//!
//! One engine serves every orchestration object kind; a kind is only a
//! [`ResourceKind`] value (identifier field, ownership type, labels field,
//! list layout, inheritance rules).
//!
//! Per-item decision:
//!
//! | record | grant              | list                 | inspect        |
//! |--------|--------------------|----------------------|----------------|
//! | none   | admin/endpoint     | keep, decorate empty | unchanged      |
//! | none   | restricted         | drop                 | deny           |
//! | found  | admin/endpoint     | keep, decorate       | decorate       |
//! | found  | public/owner/team  | keep, decorate       | decorate       |
//! | found  | no match           | drop                 | deny           |
//!
//! List omission is silent while inspect denial is explicit. A missing
//! identifier aborts the whole operation; no partially filtered body is ever
//! produced.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::access::{can_access, find_effective, CallerContext, InheritanceRule, OwnershipRecord, ResourceType};
use crate::body::{decode_body, decode_top_level_object, encode_body, kind_name};
use crate::error::{OwnerGateError, Result};
use crate::item;

/// Reserved item field carrying the resolved ownership metadata.
pub const DEFAULT_DECORATION_FIELD: &str = "Ownership";
/// Key under the decoration field holding the record (or null).
pub const DECORATION_RECORD_KEY: &str = "ResourceControl";
/// Status used for every rewritten body.
pub const STATUS_OK: u16 = 200;

/// Which response shape the upstream returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Collection endpoint.
    List,
    /// Single-object endpoint.
    Inspect,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Inspect => "inspect",
        }
    }
}

/// Where the items live in a list response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListLayout {
    /// Body is an object with the items under this field (e.g. `Volumes`).
    Field(String),
    /// Body is the array itself.
    TopLevel,
}

/// Per-kind engine configuration.
#[derive(Debug, Clone)]
pub struct ResourceKind {
    pub resource_type: ResourceType,
    pub identifier_field: String,
    /// Dotted path to the labels object in list items (e.g. `Spec.Labels`).
    pub labels_field: String,
    /// Labels path in inspect bodies, when it differs from list items.
    pub inspect_labels_field: Option<String>,
    pub list_layout: ListLayout,
    pub inherit: Vec<InheritanceRule>,
    pub decoration_field: String,
}

impl ResourceKind {
    /// Kind with `Labels` labels, a top-level list, and no inheritance.
    pub fn new(resource_type: ResourceType, identifier_field: impl Into<String>) -> Self {
        Self {
            resource_type,
            identifier_field: identifier_field.into(),
            labels_field: "Labels".to_string(),
            inspect_labels_field: None,
            list_layout: ListLayout::TopLevel,
            inherit: Vec::new(),
            decoration_field: DEFAULT_DECORATION_FIELD.to_string(),
        }
    }

    pub fn labels_field(mut self, field: impl Into<String>) -> Self {
        self.labels_field = field.into();
        self
    }

    pub fn inspect_labels_field(mut self, field: impl Into<String>) -> Self {
        self.inspect_labels_field = Some(field.into());
        self
    }

    pub fn list_layout(mut self, layout: ListLayout) -> Self {
        self.list_layout = layout;
        self
    }

    pub fn inherit(mut self, rule: InheritanceRule) -> Self {
        self.inherit.push(rule);
        self
    }

    pub fn decoration_field(mut self, field: impl Into<String>) -> Self {
        self.decoration_field = field.into();
        self
    }

    fn labels_path(&self, op: Operation) -> &str {
        match (op, &self.inspect_labels_field) {
            (Operation::Inspect, Some(path)) => path,
            _ => &self.labels_field,
        }
    }

    /// Effective record for an item: direct, else inherited through labels.
    fn resolve<'a>(
        &self,
        op: Operation,
        id: &str,
        obj: &Map<String, Value>,
        caller: &'a CallerContext,
    ) -> Option<&'a OwnershipRecord> {
        let labels = item::labels(obj, self.labels_path(op));
        find_effective(id, self.resource_type, labels, &self.inherit, &caller.snapshot)
    }
}

/// Result of an inspect decision.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectOutcome {
    Allowed(Map<String, Value>),
    Denied,
}

/// What the proxy writes back in place of the upstream body.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewrite {
    Body { status: u16, body: Bytes },
    /// Fixed, content-free denial; nothing of the original body survives.
    Denied,
}

/// Inject the resolved record (or its absence) into the reserved field.
pub fn decorate(obj: &mut Map<String, Value>, field: &str, record: Option<&OwnershipRecord>) -> Result<()> {
    let rec = serde_json::to_value(record)
        .map_err(|e| OwnerGateError::Encode(format!("ownership record encode failed: {e}")))?;
    let mut meta = Map::new();
    meta.insert(DECORATION_RECORD_KEY.to_string(), rec);
    obj.insert(field.to_string(), Value::Object(meta));
    Ok(())
}

/// Filter and decorate list items, preserving the order of kept items.
pub fn filter_items(items: Vec<Value>, kind: &ResourceKind, caller: &CallerContext) -> Result<Vec<Value>> {
    let total = items.len();
    let mut out = Vec::with_capacity(total);

    for mut value in items {
        let obj = item::as_item_mut(&mut value)?;
        let id = item::identifier(obj, &kind.identifier_field)?;
        let record = kind.resolve(Operation::List, id, obj, caller);

        let keep = caller.has_blanket_access() || can_access(caller, record);
        tracing::debug!(
            kind = %kind.resource_type,
            id = %id,
            found = record.is_some(),
            keep,
            "list item decision"
        );
        if !keep {
            continue;
        }

        decorate(obj, &kind.decoration_field, record)?;
        out.push(value);
    }

    if out.len() < total {
        tracing::debug!(kind = %kind.resource_type, total, kept = out.len(), "list filtered");
    }
    Ok(out)
}

/// Apply [`filter_items`] to a list body laid out per `kind.list_layout`.
///
/// A `Field` layout whose array is absent or null is returned unchanged.
pub fn filter_list(body: Value, kind: &ResourceKind, caller: &CallerContext) -> Result<Value> {
    match &kind.list_layout {
        ListLayout::TopLevel => match body {
            Value::Array(items) => Ok(Value::Array(filter_items(items, kind, caller)?)),
            other => Err(OwnerGateError::Decode(format!(
                "expected json array, got {}",
                kind_name(&other)
            ))),
        },
        ListLayout::Field(field) => {
            let mut obj = match body {
                Value::Object(obj) => obj,
                other => {
                    return Err(OwnerGateError::Decode(format!(
                        "expected json object, got {}",
                        kind_name(&other)
                    )))
                }
            };

            match obj.get_mut(field) {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) => {
                    let filtered = filter_items(std::mem::take(items), kind, caller)?;
                    *items = filtered;
                }
                Some(other) => {
                    return Err(OwnerGateError::Decode(format!(
                        "expected array under `{field}`, got {}",
                        kind_name(other)
                    )))
                }
            }
            Ok(Value::Object(obj))
        }
    }
}

/// Decide on a single object: decorated, unchanged, or denied.
pub fn inspect(mut obj: Map<String, Value>, kind: &ResourceKind, caller: &CallerContext) -> Result<InspectOutcome> {
    let id = item::identifier(&obj, &kind.identifier_field)?.to_string();
    let record = kind.resolve(Operation::Inspect, &id, &obj, caller);

    match record {
        None if caller.has_blanket_access() => {
            tracing::debug!(kind = %kind.resource_type, id = %id, "inspect without record (blanket access)");
            Ok(InspectOutcome::Allowed(obj))
        }
        Some(rec) if caller.has_blanket_access() || can_access(caller, Some(rec)) => {
            tracing::debug!(kind = %kind.resource_type, id = %id, "inspect allowed");
            decorate(&mut obj, &kind.decoration_field, Some(rec))?;
            Ok(InspectOutcome::Allowed(obj))
        }
        _ => {
            tracing::info!(kind = %kind.resource_type, id = %id, user = %caller.user_id, "inspect denied");
            Ok(InspectOutcome::Denied)
        }
    }
}

/// Full pipeline over a buffered body: decode, decide, re-encode.
pub fn process(raw: &[u8], op: Operation, kind: &ResourceKind, caller: &CallerContext) -> Result<Rewrite> {
    let value = match op {
        Operation::List => filter_list(decode_body(raw)?, kind, caller)?,
        Operation::Inspect => match inspect(decode_top_level_object(raw)?, kind, caller)? {
            InspectOutcome::Allowed(obj) => Value::Object(obj),
            InspectOutcome::Denied => return Ok(Rewrite::Denied),
        },
    };

    Ok(Rewrite::Body {
        status: STATUS_OK,
        body: encode_body(&value)?,
    })
}
