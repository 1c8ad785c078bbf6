use crate::ipc::error::{err, ok, store_err};
use crate::ipc::helpers::{required_id, student_json};
use crate::ipc::types::{AppState, Request};
use crate::reports;
use serde_json::json;

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.store.students() {
        Ok(students) => {
            let rows: Vec<serde_json::Value> = students.iter().map(student_json).collect();
            ok(&req.id, json!({ "students": rows }))
        }
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_group_by_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.store.students() {
        Ok(students) => ok(&req.id, json!(reports::group_by_grade(&students))),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_group_pass_fail(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.store.students() {
        Ok(students) => ok(&req.id, json!(reports::group_pass_fail(&students))),
        Err(e) => store_err(&req.id, &e),
    }
}

fn handle_remove_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_id(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.store.remove_student(&student_id) {
        Ok(true) => ok(&req.id, json!({ "removed": true })),
        Ok(false) => err(
            &req.id,
            "not_found",
            format!("student {} does not exist", student_id),
            None,
        ),
        Err(e) => store_err(&req.id, &e),
    }
}

/// Requires `params.confirm == true`; the wipe cannot be undone.
fn handle_clear(state: &mut AppState, req: &Request) -> serde_json::Value {
    let confirmed = req
        .params
        .get("confirm")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if !confirmed {
        return err(&req.id, "bad_params", "admin.clear requires confirm: true", None);
    }
    match state.store.clear() {
        Ok(()) => ok(&req.id, json!({ "cleared": true })),
        Err(e) => store_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "admin.list" => Some(handle_list(state, req)),
        "admin.groupByGrade" => Some(handle_group_by_grade(state, req)),
        "admin.groupPassFail" => Some(handle_group_pass_fail(state, req)),
        "admin.removeStudent" => Some(handle_remove_student(state, req)),
        "admin.clear" => Some(handle_clear(state, req)),
        _ => None,
    }
}
