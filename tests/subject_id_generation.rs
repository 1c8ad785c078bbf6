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

use ids::{generate_student_id, generate_subject_id, SUBJECT_ID_SPACE};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Every draw lands on the bottom of the requested range.
struct FloorRng;

impl RngCore for FloorRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        dest.fill(0);
        Ok(())
    }
}

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

fn used(ids: impl IntoIterator<Item = u64>) -> HashSet<String> {
    ids.into_iter().map(|n| n.to_string()).collect()
}

#[test]
fn never_collides_with_existing_ids() {
    let taken = used([3, 17, 42]);
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..2000 {
        let id = generate_subject_id(&taken, &mut rng);
        assert!(!taken.contains(&id), "collided on {}", id);
        let n: u64 = id.parse().expect("numeric");
        assert!(n < SUBJECT_ID_SPACE);
    }
}

#[test]
fn saturated_space_probes_upward_from_1000() {
    let taken = used(0..1000);
    let mut rng = StdRng::seed_from_u64(9);
    assert_eq!(generate_subject_id(&taken, &mut rng), "1000");

    let taken = used(1..=1000);
    let id = generate_subject_id(&taken, &mut rng);
    assert!(!taken.contains(&id));
    assert_eq!(id, "1001");
}

#[test]
fn last_free_slot_is_found() {
    let taken = used((0..1000).filter(|n| *n != 500));
    let mut rng = StdRng::seed_from_u64(11);
    assert_eq!(generate_subject_id(&taken, &mut rng), "500");
}

#[test]
fn exhausted_random_search_falls_back_to_linear_probe() {
    let taken = used([0]);
    assert_eq!(generate_subject_id(&taken, &mut FloorRng), "1");

    let taken = used([0, 1, 2]);
    assert_eq!(generate_subject_id(&taken, &mut FloorRng), "3");
}

#[test]
fn student_ids_fall_back_the_same_way() {
    let taken: HashSet<String> = ["000001".to_string()].into_iter().collect();
    assert_eq!(generate_student_id(&HashSet::new(), &mut FloorRng), "000001");
    assert_eq!(generate_student_id(&taken, &mut FloorRng), "000002");
}

#[test]
fn store_enrolment_with_pinned_rng() {
    let dir = temp_dir("enrolment-pinned-rng");
    let mut store = store::Store::open(dir.join("students.data")).expect("open store");
    store
        .register_with("Pat", "pat@x.com", "Secret123", &mut FloorRng)
        .expect("register");

    let first = store
        .enrol_subject_with("pat@x.com", &mut FloorRng)
        .expect("enrol");
    assert_eq!(first.id, "0");
    assert_eq!(first.mark, store::MIN_NEW_MARK);
    assert_eq!(first.grade, model::Grade::Z);

    let second = store
        .enrol_subject_with("pat@x.com", &mut FloorRng)
        .expect("enrol");
    assert_eq!(second.id, "1");

    let _ = std::fs::remove_dir_all(dir);
}
