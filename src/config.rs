use std::path::PathBuf;

/// Overrides the students file location when no explicit path is given.
pub const DATA_PATH_ENV: &str = "STUDENTS_DATA";
/// Log filter directives for the sidecar, e.g. `enrolmentd=debug`.
pub const LOG_FILTER_ENV: &str = "ENROLMENTD_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_DATA_FILE: &str = "students.data";

/// Explicit path, then `STUDENTS_DATA` (if non-empty), then `students.data`
/// in the working directory.
pub fn resolve_data_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| {
            std::env::var_os(DATA_PATH_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}
