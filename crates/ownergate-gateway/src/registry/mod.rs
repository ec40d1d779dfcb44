//! Resource-kind registry.
//!
//! Compiles the configured kinds (or the built-in Docker set) into engine
//! `ResourceKind` values plus their list/inspect route templates, and
//! classifies intercepted GET paths.

pub mod route;

use std::collections::HashSet;

use ownergate_core::error::{OwnerGateError, Result};
use ownergate_core::{InheritanceRule, ListLayout, Operation, ResourceKind, ResourceType};

use crate::config::KindConfig;

pub use route::RouteTemplate;

/// Docker label naming the swarm stack a resource belongs to.
pub const STACK_NAMESPACE_LABEL: &str = "com.docker.stack.namespace";
/// Docker label carrying the id of the swarm service a container belongs to.
pub const SWARM_SERVICE_ID_LABEL: &str = "com.docker.swarm.service.id";

/// One intercepted kind.
#[derive(Debug, Clone)]
pub struct CompiledKind {
    pub name: String,
    pub list: RouteTemplate,
    pub inspect: RouteTemplate,
    pub kind: ResourceKind,
}

#[derive(Debug, Clone)]
pub struct KindRegistry {
    kinds: Vec<CompiledKind>,
}

impl KindRegistry {
    /// Compile kinds; an empty slice selects [`default_kinds`].
    pub fn compile(raw: &[KindConfig], decoration_field: &str) -> Result<Self> {
        let defaults;
        let raw = if raw.is_empty() {
            defaults = default_kinds();
            &defaults[..]
        } else {
            raw
        };

        let mut kinds = Vec::with_capacity(raw.len());
        let mut paths = HashSet::new();
        for k in raw {
            let list = RouteTemplate::compile(&k.list_path, false)?;
            let inspect = RouteTemplate::compile(&k.inspect_path, true)?;
            for p in [list.as_str(), inspect.as_str()] {
                if !paths.insert(p.to_string()) {
                    return Err(OwnerGateError::BadRequest(format!(
                        "kind `{}`: route {p} already registered",
                        k.name
                    )));
                }
            }

            let layout = match &k.list_field {
                Some(f) => ListLayout::Field(f.clone()),
                None => ListLayout::TopLevel,
            };
            let mut kind = ResourceKind::new(k.resource_type, k.identifier_field.clone())
                .labels_field(k.labels_field.clone())
                .list_layout(layout)
                .decoration_field(decoration_field);
            if let Some(f) = &k.inspect_labels_field {
                kind = kind.inspect_labels_field(f.clone());
            }
            for rule in &k.inherit {
                kind = kind.inherit(rule.clone());
            }

            tracing::debug!(kind = %k.name, list = %k.list_path, inspect = %k.inspect_path, "resource kind registered");
            kinds.push(CompiledKind {
                name: k.name.clone(),
                list,
                inspect,
                kind,
            });
        }

        Ok(Self { kinds })
    }

    /// Find the kind and operation served by a GET on `path`.
    /// List templates are tried before inspect templates.
    pub fn classify(&self, path: &str) -> Option<(Operation, &CompiledKind)> {
        if let Some(k) = self.kinds.iter().find(|k| k.list.matches(path)) {
            return Some((Operation::List, k));
        }
        self.kinds
            .iter()
            .find(|k| k.inspect.matches(path))
            .map(|k| (Operation::Inspect, k))
    }

    pub fn names(&self) -> Vec<&str> {
        self.kinds.iter().map(|k| k.name.as_str()).collect()
    }
}

/// Docker Engine API kinds intercepted when the config lists none.
pub fn default_kinds() -> Vec<KindConfig> {
    let stack = || InheritanceRule::new(STACK_NAMESPACE_LABEL, ResourceType::Stack);
    let kind = |name: &str, resource_type, id: &str, list: &str, inspect: &str| KindConfig {
        name: name.into(),
        resource_type,
        identifier_field: id.into(),
        list_path: list.into(),
        inspect_path: inspect.into(),
        list_field: None,
        labels_field: "Labels".into(),
        inspect_labels_field: None,
        inherit: vec![stack()],
    };

    let mut volumes = kind("volumes", ResourceType::Volume, "Name", "/volumes", "/volumes/{id}");
    volumes.list_field = Some("Volumes".into());

    let networks = kind("networks", ResourceType::Network, "Id", "/networks", "/networks/{id}");

    let mut containers = kind(
        "containers",
        ResourceType::Container,
        "Id",
        "/containers/json",
        "/containers/{id}/json",
    );
    containers.inspect_labels_field = Some("Config.Labels".into());
    containers
        .inherit
        .push(InheritanceRule::new(SWARM_SERVICE_ID_LABEL, ResourceType::Service));

    let mut out = vec![volumes, networks, containers];
    for (name, resource_type, list, inspect) in [
        ("services", ResourceType::Service, "/services", "/services/{id}"),
        ("secrets", ResourceType::Secret, "/secrets", "/secrets/{id}"),
        ("configs", ResourceType::Config, "/configs", "/configs/{id}"),
    ] {
        let mut k = kind(name, resource_type, "ID", list, inspect);
        k.labels_field = "Spec.Labels".into();
        out.push(k);
    }
    out
}
