//! Record store integration tests, run against both backends.

use std::collections::HashSet;

use cabinet_core::db::Database;
use cabinet_core::stats::{StatsAggregator, REVENUE_PER_PATIENT};
use cabinet_core::store::{IdScheme, MemoryStore, RecordStore};
use cabinet_core::PatientFields;
use proptest::prelude::*;
use serde_json::{json, Value};

fn backends() -> Vec<Box<dyn RecordStore>> {
    vec![
        Box::new(MemoryStore::new(IdScheme::Sequential)),
        Box::new(Database::open_in_memory().unwrap()),
    ]
}

fn fields(name: &str) -> PatientFields {
    PatientFields {
        name: Some(name.into()),
        ..Default::default()
    }
}

#[test]
fn test_insert_then_list_round_trip() {
    for mut store in backends() {
        let supplied: PatientFields = serde_json::from_str(
            r#"{"name":"Moreau","status":"ATTENTE","type":"DÉTARTRAGE","email":"moreau@example.fr"}"#,
        )
        .unwrap();
        let inserted = store.insert(supplied).unwrap();

        let listed = store.list().unwrap();
        let matching: Vec<_> = listed.iter().filter(|p| p.name == Some("Moreau".into())).collect();
        assert_eq!(matching.len(), 1);

        let patient = matching[0];
        assert_eq!(patient, &inserted);
        assert!(!patient.id.is_empty());
        assert_eq!(patient.status, Some(Value::from("ATTENTE")));
        assert_eq!(patient.kind, Some(Value::from("DÉTARTRAGE")));
        assert_eq!(patient.email, Some(Value::from("moreau@example.fr")));
        assert_eq!(patient.time, "09:00");
        assert_eq!(patient.date_rdv, cabinet_core::models::today());
    }
}

#[test]
fn test_update_changes_only_named_field() {
    for mut store in backends() {
        let a = store.insert(fields("A")).unwrap();
        let b = store.insert(fields("B")).unwrap();
        let before = store.list().unwrap();

        store
            .update(
                &a.id,
                PatientFields {
                    status: Some("PRESENT".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let after = store.list().unwrap();
        let a_after = after.iter().find(|p| p.id == a.id).unwrap();
        let mut expected = before.iter().find(|p| p.id == a.id).unwrap().clone();
        expected.status = Some("PRESENT".into());
        assert_eq!(a_after, &expected);

        let b_after = after.iter().find(|p| p.id == b.id).unwrap();
        assert_eq!(b_after, &b);
    }
}

#[test]
fn test_untyped_values_and_nulls_are_stored_verbatim() {
    for mut store in backends() {
        let supplied: PatientFields = serde_json::from_str(
            r#"{"name":"Blanc","status":"ATTENTE","phone":612345678,"allergies":["latex"]}"#,
        )
        .unwrap();
        let inserted = store.insert(supplied).unwrap();

        let update: PatientFields =
            serde_json::from_str(r#"{"status":null,"phone":null}"#).unwrap();
        let updated = store.update(&inserted.id, update).unwrap();
        assert_eq!(updated.status, Some(Value::Null));
        assert_eq!(updated.phone, Some(Value::Null));

        let listed = store.list().unwrap();
        let value = serde_json::to_value(&listed[0]).unwrap();
        assert_eq!(value["status"], Value::Null);
        assert!(value.as_object().unwrap().contains_key("phone"));
        assert_eq!(value["allergies"], json!(["latex"]));
        assert_eq!(value["name"], "Blanc");
    }
}

#[test]
fn test_update_keeps_identifier_when_body_carries_one() {
    for mut store in backends() {
        let inserted = store.insert(fields("Fixe")).unwrap();

        let update: PatientFields =
            serde_json::from_str(r#"{"id":"999","name":"Fixe bis"}"#).unwrap();
        let updated = store.update(&inserted.id, update).unwrap();

        assert_eq!(updated.id, inserted.id);
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, inserted.id);
        assert_eq!(listed[0].name, Some(Value::from("Fixe bis")));
    }
}

#[test]
fn test_delete_removes_and_unknown_is_noop() {
    for mut store in backends() {
        let a = store.insert(fields("A")).unwrap();
        store.insert(fields("B")).unwrap();

        store.delete(&a.id).unwrap();
        assert!(store.list().unwrap().iter().all(|p| p.id != a.id));

        let before = store.list().unwrap();
        store.delete("does-not-exist").unwrap();
        assert_eq!(store.list().unwrap(), before);
    }
}

#[test]
fn test_document_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cabinet.db");

    let id = {
        let mut db = Database::open(&path).unwrap();
        db.insert(fields("Persistant")).unwrap().id
    };

    let db = Database::open(&path).unwrap();
    let patients = db.list().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].id, id);
    assert_eq!(patients[0].name, Some(Value::from("Persistant")));
}

#[derive(Debug, Clone)]
enum Op {
    Insert(String),
    Delete(usize),
    Update(usize, String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[A-Z][a-z]{1,8}".prop_map(Op::Insert),
        (0usize..16).prop_map(Op::Delete),
        (0usize..16, "[A-Z]{4,8}").prop_map(|(i, s)| Op::Update(i, s)),
    ]
}

proptest! {
    #[test]
    fn prop_ids_unique_and_never_reused(ops in prop::collection::vec(op_strategy(), 1..40)) {
        for mut store in backends() {
            let mut issued = HashSet::new();

            for op in &ops {
                let current = store.list().unwrap();
                match op {
                    Op::Insert(name) => {
                        let patient = store.insert(fields(name)).unwrap();
                        prop_assert!(issued.insert(patient.id.clone()), "id {} reused", patient.id);
                    }
                    Op::Delete(i) => {
                        if let Some(target) = current.get(i % current.len().max(1)) {
                            store.delete(&target.id).unwrap();
                            prop_assert!(store.list().unwrap().iter().all(|p| p.id != target.id));
                        }
                    }
                    Op::Update(i, status) => {
                        if let Some(target) = current.get(i % current.len().max(1)) {
                            let updated = store
                                .update(&target.id, PatientFields { status: Some(status.as_str().into()), ..Default::default() })
                                .unwrap();
                            prop_assert_eq!(&updated.id, &target.id);
                            prop_assert_eq!(&updated.name, &target.name);
                        }
                    }
                }

                let listed = store.list().unwrap();
                let ids: HashSet<_> = listed.iter().map(|p| p.id.clone()).collect();
                prop_assert_eq!(ids.len(), listed.len());

                let report = StatsAggregator::new(true).compute(&listed);
                prop_assert_eq!(
                    report.stats.chiffre_affaires,
                    report.stats.total_patients * REVENUE_PER_PATIENT
                );
            }
        }
    }
}
