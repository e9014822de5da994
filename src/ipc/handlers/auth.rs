use crate::ipc::error::{err, fail, ok};
use crate::ipc::helpers::{required_str, str_param};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let username = match required_str(req, "username") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let password = match required_str(req, "password") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match state.session.login(state.verifier.as_ref(), username, password) {
        Ok(session) => {
            log::info!("mentor session opened for {}", session.username);
            ok(&req.id, json!({ "session": session }))
        }
        Err(e) => {
            log::warn!("login rejected for '{}'", username);
            fail(&req.id, &e)
        }
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    // A supplied token must belong to the open session; a stale one cannot
    // end somebody else's session.
    if let Some(token) = str_param(req, "token") {
        if let Err(e) = state.session.authorize(Some(token)) {
            log::warn!("logout rejected: token does not match the open session");
            return err(&req.id, e.code(), "no active session for token", None);
        }
    }
    let was_authenticated = state.session.current().is_some();
    state.session.logout();
    if was_authenticated {
        log::info!("mentor session closed");
    }
    ok(&req.id, json!({ "ok": true }))
}

fn handle_session(state: &mut AppState, req: &Request) -> serde_json::Value {
    match state.session.authorize(str_param(req, "token")) {
        Ok(session) => ok(&req.id, json!({ "session": session })),
        Err(e) => err(&req.id, e.code(), "no active session for token", None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_login(state, req)),
        "auth.logout" => Some(handle_logout(state, req)),
        "auth.session" => Some(handle_session(state, req)),
        _ => None,
    }
}
