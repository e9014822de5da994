use crate::config::Config;
use crate::db::{self, SqliteBlobStore};
use crate::ipc::error::{err, fail, ok};
use crate::ipc::types::{AppState, Request};
use crate::store::RecordStore;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string()),
            "authenticated": state.session.current().is_some()
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    let conn = match db::open_db(&path) {
        Ok(c) => c,
        Err(e) => return err(&req.id, "db_open_failed", format!("{e:?}"), None),
    };

    // A broken config file must not keep the workspace closed.
    let config = match Config::load_from(&Config::path_in(&path)) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("using default config: {e:#}");
            Config::default()
        }
    };

    let store = match RecordStore::open(Box::new(SqliteBlobStore::new(conn)), &config.storage_key)
    {
        Ok(s) => s.with_latency(config.latency()),
        Err(e) => return fail(&req.id, &e),
    };
    let count = store.list().len();

    log::info!(
        "workspace {} opened with {} student records",
        path.to_string_lossy(),
        count
    );
    if state.session.current().is_some() {
        log::info!("mentor session closed by workspace switch");
    }
    state.session.logout();
    state.verifier = Box::new(config.verifier());
    state.config = config;
    state.store = Some(store);
    state.workspace = Some(path.clone());

    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "studentCount": count
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
