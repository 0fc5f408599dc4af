//! Property tests for environment materialization.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use rigview_env::{ConfigurationStore, Environment, FieldValue};
use std::collections::BTreeMap;
use std::sync::Arc;

type Raw = BTreeMap<String, BTreeMap<String, BTreeMap<String, FieldValue>>>;

fn field_value() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        any::<i64>().prop_map(FieldValue::Integer),
        any::<bool>().prop_map(FieldValue::Bool),
        "[A-Z_]{1,12}".prop_map(FieldValue::Text),
        vec("[A-Z_0-9]{1,8}", 0..4).prop_map(FieldValue::References),
    ]
}

fn raw_store() -> impl Strategy<Value = Raw> {
    btree_map(
        "[a-z]{1,6}",
        btree_map("[A-Z0-9_]{1,6}", btree_map("get[A-Z][a-z]{0,6}", field_value(), 0..5), 0..5),
        0..4,
    )
}

/// Builds a store whose ids are unique across categories.
fn build(raw: &Raw) -> ConfigurationStore {
    let mut store = ConfigurationStore::new();
    for (category, entities) in raw {
        store.insert_category(category.as_str());
        for (id, fields) in entities {
            let id = format!("{}:{}", category, id);
            store.insert_entity(category, &id, fields.clone());
        }
    }
    store
}

proptest! {
    #[test]
    fn prop_field_fidelity(raw in raw_store()) {
        let store = build(&raw);
        let env = Environment::new(store.clone()).unwrap();

        for (category, entities) in store.iter() {
            let bucket = env.category(category).unwrap();
            prop_assert_eq!(bucket.len(), entities.len());
            for (id, fields) in entities {
                let proxy = bucket.get(id).unwrap();
                prop_assert_eq!(proxy.field_count(), fields.len());
                for (field, value) in fields {
                    prop_assert_eq!(&proxy.get(field).unwrap(), value);
                }
            }
        }
    }

    #[test]
    fn prop_identity_stability(raw in raw_store()) {
        let env = Environment::new(build(&raw)).unwrap();

        for bucket in env.buckets() {
            for (id, proxy) in bucket.iter() {
                prop_assert!(Arc::ptr_eq(proxy, env.entity(id).unwrap()));
                prop_assert!(Arc::ptr_eq(proxy, bucket.get(id).unwrap()));
                prop_assert_eq!(proxy.category(), bucket.name());
            }
        }
        prop_assert_eq!(env.entities().count(), env.entity_count());
    }

    #[test]
    fn prop_late_binding(raw in raw_store(), replacement in any::<i64>()) {
        let env = Environment::new(build(&raw)).unwrap();
        let targets: Vec<_> = env
            .entities()
            .flat_map(|p| p.fields().map(|f| (Arc::clone(p), f.to_string())).collect::<Vec<_>>())
            .collect();

        for (proxy, field) in targets {
            env.store()
                .write()
                .set_field(proxy.category(), proxy.id(), &field, replacement);
            prop_assert_eq!(proxy.get(&field).unwrap(), FieldValue::Integer(replacement));
        }
    }

    #[test]
    fn prop_field_set_fixation(raw in raw_store()) {
        let env = Environment::new(build(&raw)).unwrap();

        for proxy in env.entities() {
            let before: Vec<String> = proxy.fields().map(str::to_string).collect();
            env.store()
                .write()
                .set_field(proxy.category(), proxy.id(), "zzAddedLater", 1i64);

            prop_assert!(!proxy.has_field("zzAddedLater"));
            prop_assert!(proxy.get("zzAddedLater").is_err());
            let after: Vec<String> = proxy.fields().map(str::to_string).collect();
            prop_assert_eq!(before, after);
        }
    }
}

#[test]
fn independence_across_categories() {
    let mut store = ConfigurationStore::new();
    store.insert_entity("beams", "BEAM_ID_1", [("getAngle", 50i64), ("getRate", 10)]);
    store.insert_entity(
        "antennas",
        "ANTENNA_ID_1",
        [("getType", FieldValue::from("ANTENNA_TYPE_1"))],
    );
    let env = Environment::new(store).unwrap();

    let beam = env.entity("BEAM_ID_1").unwrap();
    let antenna = env.entity("ANTENNA_ID_1").unwrap();
    assert_eq!(beam.fields().collect::<Vec<_>>(), vec!["getAngle", "getRate"]);
    assert_eq!(antenna.fields().collect::<Vec<_>>(), vec!["getType"]);
    assert!(!antenna.has_field("getAngle"));

    env.store()
        .write()
        .set_field("antennas", "ANTENNA_ID_1", "getType", "ANTENNA_TYPE_2");
    assert_eq!(beam.get("getAngle").unwrap(), FieldValue::Integer(50));
    assert_eq!(antenna.get("getType").unwrap().as_str(), Some("ANTENNA_TYPE_2"));
}

#[test]
fn heterogeneous_fields_within_category() {
    let store = ConfigurationStore::from_json_str(
        r#"{"beams": {"B1": {"getAngle": 1}, "B2": {"getRate": 2, "getMode": "FAST"}}}"#,
    )
    .unwrap();
    let env = Environment::new(store).unwrap();
    let beams = env.category("beams").unwrap();

    assert!(beams["B1"].has_field("getAngle"));
    assert!(!beams["B1"].has_field("getRate"));
    assert_eq!(beams["B2"].get("getMode").unwrap().as_str(), Some("FAST"));
}
