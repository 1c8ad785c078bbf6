use crate::ipc::error::{ok, store_err};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "dataPath": state.store.path().to_string_lossy(),
            "rootShape": state.store.shape(),
            "writes": state.store.write_count(),
        }),
    )
}

fn handle_ensure_file(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.store.ensure_file() {
        Ok(()) => ok(
            &req.id,
            json!({ "dataPath": state.store.path().to_string_lossy() }),
        ),
        Err(e) => store_err(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "store.ensureFile" => Some(handle_ensure_file(state, req)),
        _ => None,
    }
}
