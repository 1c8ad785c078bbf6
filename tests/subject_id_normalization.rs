#[path = "../src/document.rs"]
mod document;
#[path = "../src/error.rs"]
mod error;
#[path = "../src/ids.rs"]
mod ids;
#[path = "../src/model.rs"]
mod model;
#[path = "../src/store.rs"]
mod store;

use serde_json::json;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use store::Store;

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn seed_legacy(path: &PathBuf) {
    std::fs::write(
        path,
        json!([
            {
                "id": "300001",
                "email": "legacy@x.com",
                "password": "Secret123",
                "subjects": [
                    {"id": "Subject-042", "mark": 70, "grade": "C"},
                    {"id": 7, "mark": 88, "grade": "HD"},
                    {"id": "017", "mark": 51, "grade": "P"}
                ]
            },
            {
                "id": "300002",
                "email": "clean@x.com",
                "password": "Secret123",
                "subjects": [{"id": "5", "mark": 60, "grade": "P"}]
            }
        ])
        .to_string(),
    )
    .expect("seed file");
}

fn ids_of(s: &model::Student) -> Vec<String> {
    s.subjects.iter().map(|x| x.id.clone()).collect()
}

#[test]
fn get_normalizes_once_and_persists() {
    let dir = temp_dir("enrolment-normalize");
    let path = dir.join("students.data");
    seed_legacy(&path);

    let mut store = Store::new(&path);
    let first = store.get("legacy@x.com").expect("get");
    assert_eq!(ids_of(&first), vec!["42", "7", "17"]);
    assert_eq!(store.write_count(), 1);

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(on_disk[0]["subjects"][0]["id"], json!("42"));
    assert_eq!(on_disk[0]["subjects"][1]["id"], json!("7"));
    assert_eq!(on_disk[0]["subjects"][2]["id"], json!("17"));

    let second = store.get("legacy@x.com").expect("get again");
    assert_eq!(ids_of(&second), vec!["42", "7", "17"]);
    assert_eq!(store.write_count(), 1);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn clean_record_lookup_does_not_write() {
    let dir = temp_dir("enrolment-normalize-clean");
    let path = dir.join("students.data");
    seed_legacy(&path);

    let mut store = Store::new(&path);
    let clean = store.get("clean@x.com").expect("get");
    assert_eq!(ids_of(&clean), vec!["5"]);
    assert_eq!(store.write_count(), 0);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn stored_grades_are_trusted() {
    let dir = temp_dir("enrolment-normalize-grade");
    let path = dir.join("students.data");
    std::fs::write(
        &path,
        json!([{
            "email": "edited@x.com",
            "password": "Secret123",
            "subjects": [{"id": "1", "mark": 99, "grade": "Z"}]
        }])
        .to_string(),
    )
    .expect("seed file");

    let mut store = Store::new(&path);
    let s = store.get("edited@x.com").expect("get");
    assert_eq!(s.subjects[0].grade, model::Grade::Z);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn delete_accepts_any_encoding_of_the_id() {
    let dir = temp_dir("enrolment-normalize-delete");
    let path = dir.join("students.data");
    seed_legacy(&path);

    let mut store = Store::new(&path);
    assert!(store
        .delete_subject("legacy@x.com", "Subject-7")
        .expect("delete 7"));
    assert!(store.delete_subject("legacy@x.com", "042").expect("delete 42"));
    assert!(!store.delete_subject("legacy@x.com", "42").expect("gone"));
    assert_eq!(ids_of(&store.get("legacy@x.com").expect("get")), vec!["17"]);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn enrol_after_migration_avoids_existing_ids() {
    let dir = temp_dir("enrolment-normalize-enrol");
    let path = dir.join("students.data");
    seed_legacy(&path);

    let mut store = Store::new(&path);
    let subject = store.enrol_subject("legacy@x.com").expect("enrol");
    assert!(!["42", "7", "17"].contains(&subject.id.as_str()));

    let s = store.get("legacy@x.com").expect("get");
    assert_eq!(s.subjects.len(), 4);
    let err = store
        .enrol_subject("legacy@x.com")
        .expect_err("cap reached");
    assert!(matches!(err, error::StoreError::LimitReached { .. }));

    let _ = std::fs::remove_dir_all(dir);
}
