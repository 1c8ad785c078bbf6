use serde_json::json;

use super::error::err;
use super::types::Request;
use crate::model::Student;

/// Trimmed string param, or a ready-made `bad_params` response.
pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    match req.params.get(key).and_then(|v| v.as_str()) {
        Some(v) => Ok(v.trim().to_string()),
        None => Err(err(
            &req.id,
            "bad_params",
            format!("missing params.{}", key),
            None,
        )),
    }
}

/// Like `required_str`, but numeric ids are accepted and stringified.
pub fn required_id(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    match req.params.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        _ => Err(err(
            &req.id,
            "bad_params",
            format!("missing params.{}", key),
            None,
        )),
    }
}

/// Student as front ends see it: no password, derived figures included.
pub fn student_json(s: &Student) -> serde_json::Value {
    json!({
        "id": s.id,
        "name": s.name,
        "email": s.email,
        "subjects": s.subjects,
        "average": s.average_mark(),
        "grade": s.grade_from_average(),
        "canEnrolMore": s.can_enrol_more(),
    })
}
