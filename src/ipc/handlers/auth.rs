use crate::ipc::error::{ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::validation::{email_to_name, valid_email, valid_password};
use serde_json::json;

/// Bad credentials are a normal answer, not an IPC error.
fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let email = req
        .params
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let password = req
        .params
        .get("password")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    match state.store.authenticate(email, password) {
        Ok(outcome) => ok(
            &req.id,
            json!({ "authenticated": outcome.is_ok(), "outcome": outcome.code() }),
        ),
        Err(e) => store_err(&req.id, &e),
    }
}

/// Format rules front ends apply before registering or logging in.
fn handle_check_format(req: &Request) -> serde_json::Value {
    let email = req
        .params
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let password = req.params.get("password").and_then(|v| v.as_str());

    ok(
        &req.id,
        json!({
            "emailValid": valid_email(email),
            "passwordValid": password.map(valid_password),
            "displayName": email_to_name(email),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.checkFormat" => Some(handle_check_format(req)),
        _ => None,
    }
}
