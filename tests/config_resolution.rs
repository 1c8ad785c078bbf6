#[path = "../src/config.rs"]
mod config;

use serial_test::serial;
use std::path::PathBuf;

#[test]
#[serial]
fn explicit_path_wins() {
    std::env::set_var(config::DATA_PATH_ENV, "/tmp/from-env.data");
    let p = config::resolve_data_path(Some(PathBuf::from("/tmp/explicit.data")));
    assert_eq!(p, PathBuf::from("/tmp/explicit.data"));
    std::env::remove_var(config::DATA_PATH_ENV);
}

#[test]
#[serial]
fn env_override_is_next() {
    std::env::set_var(config::DATA_PATH_ENV, "/tmp/from-env.data");
    assert_eq!(
        config::resolve_data_path(None),
        PathBuf::from("/tmp/from-env.data")
    );
    std::env::remove_var(config::DATA_PATH_ENV);
}

#[test]
#[serial]
fn default_is_students_data_in_working_dir() {
    std::env::remove_var(config::DATA_PATH_ENV);
    assert_eq!(
        config::resolve_data_path(None),
        PathBuf::from(config::DEFAULT_DATA_FILE)
    );

    std::env::set_var(config::DATA_PATH_ENV, "");
    assert_eq!(
        config::resolve_data_path(Some(PathBuf::new())),
        PathBuf::from("students.data")
    );
    std::env::remove_var(config::DATA_PATH_ENV);
}
