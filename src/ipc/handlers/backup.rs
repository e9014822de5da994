use crate::backup;
use crate::ipc::error::{err, fail, ok};
use crate::ipc::helpers::{mentor_store, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use std::path::PathBuf;

fn handle_backup_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let out_path = match required_str(req, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(resp) => return resp,
    };

    match backup::export_records_bundle(&store.list(), &out_path) {
        Ok(summary) => {
            log::info!(
                "exported {} records to {}",
                summary.record_count,
                out_path.to_string_lossy()
            );
            ok(
                &req.id,
                json!({
                    "bundleFormat": summary.bundle_format,
                    "recordCount": summary.record_count,
                    "sha256": summary.sha256,
                    "outPath": out_path.to_string_lossy()
                }),
            )
        }
        Err(e) => err(&req.id, "backup_failed", format!("{e:#}"), None),
    }
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let in_path = match required_str(req, "inPath") {
        Ok(v) => PathBuf::from(v),
        Err(resp) => return resp,
    };

    let students = match backup::import_records_bundle(&in_path) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "backup_failed", format!("{e:#}"), None),
    };
    let count = students.len();
    if let Err(e) = store.replace_all(students) {
        return fail(&req.id, &e);
    }
    log::info!(
        "restored {} records from {}",
        count,
        in_path.to_string_lossy()
    );
    ok(&req.id, json!({ "recordCount": count }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.export" => Some(handle_backup_export(state, req)),
        "backup.import" => Some(handle_backup_import(state, req)),
        _ => None,
    }
}
