use crate::calc;
use crate::error::Error;
use crate::ipc::error::{err, fail, ok};
use crate::ipc::helpers::{mentor_store, open_store, required_str, str_param};
use crate::ipc::types::{AppState, Request};
use crate::model::{NewStudent, Role, SignatureKind, StudentPatch};
use crate::query;
use serde_json::json;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    ok(&req.id, json!({ "students": store.list() }))
}

fn handle_students_search(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let q = str_param(req, "query").unwrap_or("");
    ok(&req.id, json!({ "students": query::search(store.list(), q) }))
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.get_by_id(student_id) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => fail(&req.id, &e),
    }
}

/// Parent-facing: no session, exact roll number only.
fn handle_students_find_by_roll(state: &mut AppState, req: &Request) -> serde_json::Value {
    let thresholds = state.config.thresholds();
    let store = match open_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let roll_number = match required_str(req, "rollNumber") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.get_by_roll_number(roll_number) {
        Ok(student) => {
            let report = calc::student_report(&student, thresholds);
            ok(
                &req.id,
                json!({ "student": student, "report": report, "viewerRole": Role::Parent }),
            )
        }
        Err(Error::NotFound(_)) => err(
            &req.id,
            "not_found",
            "no student with that roll number",
            None,
        ),
        Err(e) => fail(&req.id, &e),
    }
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let Some(raw) = req.params.get("student") else {
        return err(&req.id, "bad_params", "missing student", None);
    };
    let data: NewStudent = match serde_json::from_value(raw.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", format!("invalid student: {e}"), None),
    };

    match store.add(data) {
        Ok(student) => {
            log::info!("created student {} ({})", student.id, student.roll_number);
            ok(
                &req.id,
                json!({ "studentId": student.id.clone(), "student": student }),
            )
        }
        Err(e) => fail(&req.id, &e),
    }
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(raw) = req.params.get("patch").filter(|v| v.is_object()) else {
        return err(&req.id, "bad_params", "missing/invalid patch", None);
    };
    let patch: StudentPatch = match serde_json::from_value(raw.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", format!("invalid patch: {e}"), None),
    };

    match store.update(student_id, patch) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => fail(&req.id, &e),
    }
}

fn handle_students_set_signature(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(kind) = str_param(req, "kind").and_then(SignatureKind::parse) else {
        return err(
            &req.id,
            "bad_params",
            "kind must be 'mentor' or 'principal'",
            None,
        );
    };
    // null, missing or "" all clear the slot.
    let payload = str_param(req, "payload");

    match store.set_signature(student_id, kind, payload) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => fail(&req.id, &e),
    }
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.delete(student_id) {
        Ok(()) => ok(&req.id, json!({ "ok": true })),
        Err(e) => fail(&req.id, &e),
    }
}

/// Acknowledges the request only; nothing is sent anywhere.
fn handle_students_notify_parent(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.get_by_id(student_id) {
        Ok(student) => {
            log::info!(
                "parent notification requested for {} ({}); delivery is not wired up",
                student.name,
                student.roll_number
            );
            ok(
                &req.id,
                json!({ "studentId": student.id, "delivered": false }),
            )
        }
        Err(e) => fail(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.search" => Some(handle_students_search(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.findByRollNumber" => Some(handle_students_find_by_roll(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.setSignature" => Some(handle_students_set_signature(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        "students.notifyParent" => Some(handle_students_notify_parent(state, req)),
        _ => None,
    }
}
