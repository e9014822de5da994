use crate::ipc::error::{err, fail};
use crate::ipc::types::{AppState, Request};
use crate::store::RecordStore;

pub fn str_param<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

pub fn required_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, serde_json::Value> {
    str_param(req, key).ok_or_else(|| err(&req.id, "bad_params", format!("missing {key}"), None))
}

/// Store access for requests that may come from anyone (parent lookup).
pub fn open_store<'a>(
    state: &'a mut AppState,
    req: &Request,
) -> Result<&'a mut RecordStore, serde_json::Value> {
    state
        .store
        .as_mut()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

/// Store access gated on `params.token` matching the active mentor session.
pub fn mentor_store<'a>(
    state: &'a mut AppState,
    req: &Request,
) -> Result<&'a mut RecordStore, serde_json::Value> {
    if let Err(e) = state.session.authorize(str_param(req, "token")) {
        return Err(fail(&req.id, &e));
    }
    open_store(state, req)
}
