use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::ids::canonical_subject_id_value;
use crate::model::Student;

const TARGET_DOCUMENT: &str = "enrolmentd::document";

/// Key holding the student list in a dict-root document.
pub const STUDENTS_KEY: &str = "students";
/// A dict-root `students` value that is not a list is moved here, so the next
/// write does not drop it.
pub const UNREADABLE_STUDENTS_KEY: &str = "students_unreadable";

/// Top-level encoding of the students file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RootShape {
    /// `[ Student, ... ]`
    List,
    /// `{ "students": [ Student, ... ], ...other keys }`
    Dict,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub shape: RootShape,
    pub students: Vec<Student>,
    /// Dict-root keys other than `students`, written back untouched.
    pub meta: Map<String, Value>,
    /// Indices of students whose subject ids were rewritten from a legacy
    /// encoding while decoding.
    pub migrated: BTreeSet<usize>,
}

#[derive(Serialize)]
struct DictRoot<'a> {
    #[serde(flatten)]
    meta: &'a Map<String, Value>,
    students: &'a [Student],
}

impl Document {
    pub fn empty(shape: RootShape) -> Self {
        Self {
            shape,
            students: Vec::new(),
            meta: Map::new(),
            migrated: BTreeSet::new(),
        }
    }

    /// Decode file contents. Text that is not JSON, or whose root is neither an
    /// array nor an object, yields an empty document of `fallback` shape.
    pub fn decode(text: &str, fallback: RootShape) -> Result<Self, StoreError> {
        let root: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                warn!(target: TARGET_DOCUMENT, error = %e, "students document is not valid JSON, treating it as empty");
                return Ok(Self::empty(fallback));
            }
        };

        let (shape, records, meta) = match root {
            Value::Array(items) => (RootShape::List, items, Map::new()),
            Value::Object(mut map) => {
                let records = match map.remove(STUDENTS_KEY) {
                    Some(Value::Array(items)) => items,
                    Some(other) => {
                        let key = free_key(&map, UNREADABLE_STUDENTS_KEY);
                        warn!(target: TARGET_DOCUMENT, found = %json_kind(&other), kept_as = %key, "`students` is not a list, treating it as empty");
                        map.insert(key, other);
                        Vec::new()
                    }
                    None => Vec::new(),
                };
                (RootShape::Dict, records, map)
            }
            other => {
                warn!(target: TARGET_DOCUMENT, found = %json_kind(&other), "unsupported students document root, treating it as empty");
                return Ok(Self::empty(fallback));
            }
        };

        let mut students = Vec::with_capacity(records.len());
        let mut migrated = BTreeSet::new();
        for (index, mut record) in records.into_iter().enumerate() {
            let rewritten = migrate_subject_ids(&mut record);
            if rewritten > 0 {
                info!(target: TARGET_DOCUMENT, index, rewritten, "normalized legacy subject ids");
                migrated.insert(index);
            }
            let student: Student = serde_json::from_value(record)
                .map_err(|source| StoreError::InvalidRecord { index, source })?;
            students.push(student);
        }

        Ok(Self {
            shape,
            students,
            meta,
            migrated,
        })
    }

    /// Pretty-printed JSON in this document's shape.
    pub fn encode(&self) -> Result<String, StoreError> {
        let text = match self.shape {
            RootShape::List => serde_json::to_string_pretty(&self.students)?,
            RootShape::Dict => serde_json::to_string_pretty(&DictRoot {
                meta: &self.meta,
                students: &self.students,
            })?,
        };
        Ok(text)
    }

    pub fn position(&self, email: &str) -> Option<usize> {
        self.students.iter().position(|s| s.matches_email(email))
    }

    pub fn student_ids(&self) -> HashSet<String> {
        self.students.iter().filter_map(|s| s.id.clone()).collect()
    }
}

/// Rewrite every subject id in a raw student record to its canonical string.
/// Returns how many ids changed.
fn migrate_subject_ids(record: &mut Value) -> usize {
    let Some(subjects) = record.get_mut("subjects").and_then(Value::as_array_mut) else {
        return 0;
    };
    let mut changed = 0;
    for subject in subjects.iter_mut() {
        let Some(id) = subject.get_mut("id") else {
            continue;
        };
        let Some(canonical) = canonical_subject_id_value(id) else {
            continue;
        };
        if id.as_str() != Some(canonical.as_str()) {
            *id = Value::String(canonical);
            changed += 1;
        }
    }
    changed
}

/// `base`, or `base_2`, `base_3`, ... when earlier values already hold it.
fn free_key(map: &Map<String, Value>, base: &str) -> String {
    if !map.contains_key(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|k| !map.contains_key(k))
        .unwrap_or_else(|| base.to_string())
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
