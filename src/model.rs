use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::ids::canonical_subject_id;

/// A student may hold at most this many live subjects.
pub const MAX_SUBJECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    Z,
    P,
    C,
    D,
    HD,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::Z, Grade::P, Grade::C, Grade::D, Grade::HD];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Z => "Z",
            Grade::P => "P",
            Grade::C => "C",
            Grade::D => "D",
            Grade::HD => "HD",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds apply to any integer, including out-of-range marks.
pub fn grade_from_mark(mark: i64) -> Grade {
    if mark >= 85 {
        Grade::HD
    } else if mark >= 75 {
        Grade::D
    } else if mark >= 65 {
        Grade::C
    } else if mark >= 50 {
        Grade::P
    } else {
        Grade::Z
    }
}

/// Round half up: `floor(x + 0.5)`. 64.5 -> 65, 64.49 -> 64.
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Identity key for email lookups: trimmed and lowercased.
pub fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(deserialize_with = "deserialize_mark")]
    pub mark: i64,
    pub grade: Grade,
}

impl Subject {
    /// The grade is derived once here and never re-derived from storage.
    pub fn new(id: impl Into<String>, mark: i64) -> Self {
        Self {
            id: id.into(),
            mark,
            grade: grade_from_mark(mark),
        }
    }
}

/// Whole-number view of a stored mark. Other writers may have left `70.0`
/// or `"70"`; fractional parts are truncated.
pub fn mark_from_value(value: &Value) -> Option<i64> {
    let truncate = |f: f64| f.is_finite().then(|| f.trunc() as i64);
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn deserialize_mark<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    mark_from_value(&raw).ok_or_else(|| D::Error::custom(format!("mark is not a number: {raw}")))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Keys this model does not know about; carried through unchanged.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Student {
    pub fn new(
        id: Option<String>,
        name: Option<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name,
            email: email.into(),
            password: password.into(),
            subjects: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn matches_email(&self, email: &str) -> bool {
        email_key(&self.email) == email_key(email)
    }

    pub fn can_enrol_more(&self) -> bool {
        self.subjects.len() < MAX_SUBJECTS
    }

    pub fn subject_ids(&self) -> HashSet<String> {
        self.subjects
            .iter()
            .map(|s| canonical_subject_id(&s.id))
            .collect()
    }

    pub fn has_subject(&self, id: &str) -> bool {
        let wanted = canonical_subject_id(id);
        self.subjects
            .iter()
            .any(|s| canonical_subject_id(&s.id) == wanted)
    }

    /// Returns false (and leaves the list alone) once the cap is reached.
    pub fn add_subject(&mut self, subject: Subject) -> bool {
        if !self.can_enrol_more() {
            return false;
        }
        self.subjects.push(subject);
        true
    }

    /// Drops every subject whose canonical id matches. Returns whether any went.
    pub fn remove_subject(&mut self, id: &str) -> bool {
        let wanted = canonical_subject_id(id);
        let before = self.subjects.len();
        self.subjects
            .retain(|s| canonical_subject_id(&s.id) != wanted);
        self.subjects.len() != before
    }

    pub fn average_mark(&self) -> Option<f64> {
        if self.subjects.is_empty() {
            return None;
        }
        let total: i64 = self.subjects.iter().map(|s| s.mark).sum();
        Some(total as f64 / self.subjects.len() as f64)
    }

    pub fn grade_from_average(&self) -> Option<Grade> {
        self.average_mark()
            .map(|avg| grade_from_mark(round_half_up(avg)))
    }
}
