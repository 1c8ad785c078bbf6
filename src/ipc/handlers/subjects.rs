use crate::ipc::error::{ok, store_err};
use crate::ipc::helpers::{required_id, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model::MAX_SUBJECTS;
use serde_json::json;

fn handle_enrol(state: &mut AppState, req: &Request) -> serde_json::Value {
    let email = match required_str(req, "email") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let subject = match state.store.enrol_subject(&email) {
        Ok(v) => v,
        Err(e) => return store_err(&req.id, &e),
    };
    // Count comes from a fresh read so the reply matches what is on disk.
    let enrolled = match state.store.get(&email) {
        Ok(s) => s.subjects.len(),
        Err(e) => return store_err(&req.id, &e),
    };
    ok(
        &req.id,
        json!({
            "subject": subject,
            "enrolled": enrolled,
            "max": MAX_SUBJECTS,
        }),
    )
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let email = match required_str(req, "email") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let subject_id = match required_id(req, "subjectId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let removed = match state.store.delete_subject(&email, &subject_id) {
        Ok(v) => v,
        Err(e) => return store_err(&req.id, &e),
    };
    let enrolled = match state.store.get(&email) {
        Ok(s) => s.subjects.len(),
        Err(e) => return store_err(&req.id, &e),
    };
    ok(
        &req.id,
        json!({
            "removed": removed,
            "enrolled": enrolled,
            "max": MAX_SUBJECTS,
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.enrol" => Some(handle_enrol(state, req)),
        "subjects.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
