use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{required_str, student_json};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use serde_json::json;

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let email = match required_str(req, "email") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.store.get(&email) {
        Ok(s) => ok(&req.id, json!({ "student": student_json(&s) })),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    let email = match required_str(req, "email") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let password = match required_str(req, "password") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if email.is_empty() || password.is_empty() {
        return err(
            &req.id,
            "bad_params",
            "email/password must not be empty",
            None,
        );
    }
    let name = req
        .params
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    match state.store.register(name, &email, &password) {
        Ok(s) => ok(&req.id, json!({ "student": student_json(&s) })),
        Err(e) => store_err(&req.id, &e),
    }
}

/// Full-record replacement keyed by email.
fn handle_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(raw) = req.params.get("student") else {
        return err(&req.id, "bad_params", "missing params.student", None);
    };
    let student: Student = match serde_json::from_value(raw.clone()) {
        Ok(v) => v,
        Err(e) => {
            return err(
                &req.id,
                "bad_params",
                format!("invalid student: {}", e),
                None,
            )
        }
    };
    if student.email.trim().is_empty() {
        return err(&req.id, "bad_params", "student.email must not be empty", None);
    }
    match state.store.upsert(&student) {
        Ok(()) => ok(&req.id, json!({ "email": student.email })),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_change_password(state: &mut AppState, req: &Request) -> serde_json::Value {
    let email = match required_str(req, "email") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let password = match required_str(req, "password") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if password.is_empty() {
        return err(&req.id, "bad_params", "password must not be empty", None);
    }
    match state.store.change_password(&email, &password) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => store_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.get" => Some(handle_get(state, req)),
        "students.register" => Some(handle_register(state, req)),
        "students.save" => Some(handle_save(state, req)),
        "students.changePassword" => Some(handle_change_password(state, req)),
        _ => None,
    }
}
