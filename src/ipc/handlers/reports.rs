use crate::calc;
use crate::ipc::error::{fail, ok};
use crate::ipc::helpers::{mentor_store, required_str};
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_reports_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let thresholds = state.config.thresholds();
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let summary = calc::class_summary(&store.list(), thresholds);
    ok(
        &req.id,
        json!({
            "summary": summary,
            "passMark": thresholds.pass_mark,
            "attendanceThreshold": thresholds.attendance
        }),
    )
}

fn handle_reports_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let thresholds = state.config.thresholds();
    let store = match mentor_store(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let student_id = match required_str(req, "studentId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match store.get_by_id(student_id) {
        Ok(student) => ok(
            &req.id,
            json!({
                "studentId": student.id,
                "report": calc::student_report(&student, thresholds)
            }),
        ),
        Err(e) => fail(&req.id, &e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.summary" => Some(handle_reports_summary(state, req)),
        "reports.student" => Some(handle_reports_student(state, req)),
        _ => None,
    }
}
