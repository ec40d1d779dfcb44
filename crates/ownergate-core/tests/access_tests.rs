//! Access evaluator and inheritance resolver tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use serde_json::{json, Map, Value};

use ownergate_core::access::{can_access, find_direct, find_effective};
use ownergate_core::{CallerContext, InheritanceRule, OwnershipRecord, OwnershipSnapshot, ResourceType};

fn labels(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap()
}

fn caller(user: &str, teams: &[&str]) -> CallerContext {
    CallerContext::user(user, Arc::new(OwnershipSnapshot::empty())).with_teams(teams.iter().copied())
}

#[test]
fn missing_record_never_grants() {
    assert!(!can_access(&caller("u1", &["ops"]), None));
    // blanket access is the engine's call, not the evaluator's
    assert!(!can_access(&caller("root", &[]).admin(), None));
}

#[test]
fn public_record_grants_anyone() {
    let rec = OwnershipRecord::new("v1", ResourceType::Volume).public();
    assert!(can_access(&caller("anyone", &[]), Some(&rec)));
}

#[test]
fn owner_and_team_grants() {
    let rec = OwnershipRecord::new("v1", ResourceType::Volume)
        .with_users(["u1"])
        .with_teams(["ops", "sre"]);

    assert!(can_access(&caller("u1", &[]), Some(&rec)));
    assert!(can_access(&caller("u2", &["dev", "sre"]), Some(&rec)));
    assert!(!can_access(&caller("u2", &["dev"]), Some(&rec)));
    assert!(!can_access(&caller("u2", &[]), Some(&rec)));
}

#[test]
fn direct_lookup_is_keyed_by_type() {
    let snap = OwnershipSnapshot::from_records([
        OwnershipRecord::new("web", ResourceType::Service).with_users(["u1"]),
    ])
    .unwrap();

    assert!(find_direct("web", ResourceType::Service, &snap).is_some());
    assert!(find_direct("web", ResourceType::Stack, &snap).is_none());
    assert!(find_direct("api", ResourceType::Service, &snap).is_none());
}

#[test]
fn duplicate_records_rejected() {
    let err = OwnershipSnapshot::from_records([
        OwnershipRecord::new("v1", ResourceType::Volume),
        OwnershipRecord::new("v1", ResourceType::Volume).public(),
    ])
    .expect_err("duplicate pair must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");

    // same id, different type is fine
    let snap = OwnershipSnapshot::from_records([
        OwnershipRecord::new("x", ResourceType::Volume),
        OwnershipRecord::new("x", ResourceType::Stack),
    ])
    .unwrap();
    assert_eq!(snap.len(), 2);
}

#[test]
fn direct_record_wins_over_inherited() {
    let snap = OwnershipSnapshot::from_records([
        OwnershipRecord::new("v1", ResourceType::Volume).with_users(["u1"]),
        OwnershipRecord::new("s1", ResourceType::Stack).public(),
    ])
    .unwrap();
    let rules = [InheritanceRule::new("ns", ResourceType::Stack)];
    let l = labels(json!({ "ns": "s1" }));

    let rec = find_effective("v1", ResourceType::Volume, Some(&l), &rules, &snap).unwrap();
    assert_eq!(rec.resource_type, ResourceType::Volume);
    assert!(!rec.public);
}

#[test]
fn inherited_record_via_label() {
    let snap = OwnershipSnapshot::from_records([OwnershipRecord::new("s1", ResourceType::Stack).public()]).unwrap();
    let rules = [InheritanceRule::new("ns", ResourceType::Stack)];

    let l = labels(json!({ "ns": "s1" }));
    let rec = find_effective("v9", ResourceType::Volume, Some(&l), &rules, &snap).unwrap();
    assert_eq!(rec.resource_id, "s1");

    // empty, missing, non-string, and dangling labels resolve to nothing
    for l in [json!({ "ns": "" }), json!({}), json!({ "ns": 7 }), json!({ "ns": "s2" })] {
        let l = labels(l);
        assert!(find_effective("v9", ResourceType::Volume, Some(&l), &rules, &snap).is_none());
    }
    assert!(find_effective("v9", ResourceType::Volume, None, &rules, &snap).is_none());
}

#[test]
fn inheritance_rules_tried_in_order() {
    let snap = OwnershipSnapshot::from_records([
        OwnershipRecord::new("web", ResourceType::Service).with_teams(["ops"]),
        OwnershipRecord::new("shop", ResourceType::Stack).public(),
    ])
    .unwrap();
    let rules = [
        InheritanceRule::new("com.docker.stack.namespace", ResourceType::Stack),
        InheritanceRule::new("com.docker.swarm.service.name", ResourceType::Service),
    ];

    let both = labels(json!({
        "com.docker.swarm.service.name": "web",
        "com.docker.stack.namespace": "shop"
    }));
    let rec = find_effective("c1", ResourceType::Container, Some(&both), &rules, &snap).unwrap();
    assert_eq!(rec.resource_type, ResourceType::Stack);

    let svc_only = labels(json!({ "com.docker.swarm.service.name": "web" }));
    let rec = find_effective("c1", ResourceType::Container, Some(&svc_only), &rules, &snap).unwrap();
    assert_eq!(rec.resource_type, ResourceType::Service);
}
