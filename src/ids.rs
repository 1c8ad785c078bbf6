use rand::Rng;
use serde_json::Value;
use std::collections::HashSet;

/// Random draws for subject ids come from `0..SUBJECT_ID_SPACE`.
pub const SUBJECT_ID_SPACE: u64 = 1000;
const SUBJECT_ID_ATTEMPTS: usize = 1000;
const LEGACY_SUBJECT_PREFIX: &str = "Subject-";

const STUDENT_ID_MIN: u64 = 1;
const STUDENT_ID_MAX: u64 = 999_999;
const STUDENT_ID_ATTEMPTS: usize = 1000;

/// Canonical subject id: unpadded digits. `"Subject-042"`, `"042"` and `"42"`
/// all map to `"42"`. Anything that is not digits after the legacy prefix is
/// returned trimmed but otherwise untouched.
pub fn canonical_subject_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix(LEGACY_SUBJECT_PREFIX)
        .unwrap_or(trimmed);
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.to_string();
    }
    let unpadded = body.trim_start_matches('0');
    if unpadded.is_empty() {
        "0".to_string()
    } else {
        unpadded.to_string()
    }
}

/// Canonical form of a stored JSON id, or `None` when the value is neither a
/// string nor an integer.
pub fn canonical_subject_id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(canonical_subject_id(s)),
        Value::Number(n) => n
            .as_u64()
            .map(|v| v.to_string())
            .or_else(|| n.as_i64().map(|v| v.to_string())),
        _ => None,
    }
}

/// Pick an id not in `used` (which must already hold canonical ids).
///
/// Rejection-samples `0..1000` up to 1000 times, then probes linearly from 0.
/// Once 1000 or more ids are taken it skips sampling and probes from 1000.
pub fn generate_subject_id<R: Rng + ?Sized>(used: &HashSet<String>, rng: &mut R) -> String {
    if used.len() as u64 >= SUBJECT_ID_SPACE {
        return probe_from(used, SUBJECT_ID_SPACE);
    }
    for _ in 0..SUBJECT_ID_ATTEMPTS {
        let candidate = rng.gen_range(0..SUBJECT_ID_SPACE).to_string();
        if !used.contains(&candidate) {
            return candidate;
        }
    }
    probe_from(used, 0)
}

fn probe_from(used: &HashSet<String>, start: u64) -> String {
    let mut n = start;
    loop {
        let candidate = n.to_string();
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Six-digit zero-padded student id in `000001..=999999`, unique among `used`.
pub fn generate_student_id<R: Rng + ?Sized>(used: &HashSet<String>, rng: &mut R) -> String {
    for _ in 0..STUDENT_ID_ATTEMPTS {
        let candidate = format!("{:06}", rng.gen_range(STUDENT_ID_MIN..=STUDENT_ID_MAX));
        if !used.contains(&candidate) {
            return candidate;
        }
    }
    let mut n = STUDENT_ID_MIN;
    loop {
        let candidate = format!("{:06}", n);
        if !used.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
