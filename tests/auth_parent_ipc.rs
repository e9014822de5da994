use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_mentord");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn mentord");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error")
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn error_code(value: &serde_json::Value) -> Option<&str> {
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
}

fn login(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) -> String {
    let res = request_ok(
        stdin,
        reader,
        "login",
        "auth.login",
        json!({ "username": "mentor", "password": "admin123" }),
    );
    res.get("session")
        .and_then(|s| s.get("token"))
        .and_then(|v| v.as_str())
        .expect("session token")
        .to_string()
}

#[test]
fn login_accepts_only_the_mentor_pair() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    for (i, user) in ["mentor", "MENTOR", "MeNtOr"].iter().enumerate() {
        let res = request_ok(
            &mut stdin,
            &mut reader,
            &format!("ok-{i}"),
            "auth.login",
            json!({ "username": user, "password": "admin123" }),
        );
        let session = res.get("session").expect("session");
        assert_eq!(session.get("role").and_then(|v| v.as_str()), Some("MENTOR"));
        assert_eq!(
            session.get("username").and_then(|v| v.as_str()),
            Some("Mentor Admin")
        );
        assert!(session
            .get("token")
            .and_then(|v| v.as_str())
            .is_some_and(|t| !t.is_empty()));
    }

    for (i, (user, pass)) in [
        ("mentor", "Admin123"),
        ("parent", "admin123"),
        ("mentor", ""),
        ("", "admin123"),
    ]
    .iter()
    .enumerate()
    {
        let resp = request(
            &mut stdin,
            &mut reader,
            &format!("bad-{i}"),
            "auth.login",
            json!({ "username": user, "password": pass }),
        );
        assert_eq!(error_code(&resp), Some("invalid_credentials"));
    }

    let resp = request(
        &mut stdin,
        &mut reader,
        "missing",
        "auth.login",
        json!({ "username": "mentor" }),
    );
    assert_eq!(error_code(&resp), Some("bad_params"));
}

#[test]
fn mentor_methods_require_the_active_token() {
    let workspace = temp_dir("mentord-auth-gate");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ws",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let anon = request(&mut stdin, &mut reader, "1", "students.list", json!({}));
    assert_eq!(error_code(&anon), Some("unauthorized"));

    let token = login(&mut stdin, &mut reader);
    let forged = request(
        &mut stdin,
        &mut reader,
        "2",
        "students.list",
        json!({ "token": "not-the-token" }),
    );
    assert_eq!(error_code(&forged), Some("unauthorized"));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.list",
        json!({ "token": token }),
    );
    let current = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "auth.session",
        json!({ "token": token }),
    );
    assert_eq!(
        current
            .get("session")
            .and_then(|s| s.get("token"))
            .and_then(|v| v.as_str()),
        Some(token.as_str())
    );

    let _ = request_ok(&mut stdin, &mut reader, "5", "auth.logout", json!({}));
    let after = request(
        &mut stdin,
        &mut reader,
        "6",
        "students.list",
        json!({ "token": token }),
    );
    assert_eq!(error_code(&after), Some("unauthorized"));
    let session = request(
        &mut stdin,
        &mut reader,
        "7",
        "auth.session",
        json!({ "token": token }),
    );
    assert_eq!(error_code(&session), Some("unauthorized"));

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn failed_login_keeps_session_anonymous() {
    let workspace = temp_dir("mentord-auth-failed");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ws",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "username": "mentor", "password": "nope" }),
    );
    let health = request_ok(&mut stdin, &mut reader, "2", "health", json!({}));
    assert_eq!(
        health.get("authenticated").and_then(|v| v.as_bool()),
        Some(false)
    );
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn parent_lookup_needs_no_session_and_matches_exactly() {
    let workspace = temp_dir("mentord-parent-lookup");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let early = request(
        &mut stdin,
        &mut reader,
        "0",
        "students.findByRollNumber",
        json!({ "rollNumber": "2024002" }),
    );
    assert_eq!(error_code(&early), Some("no_workspace"));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ws",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let found = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.findByRollNumber",
        json!({ "rollNumber": "2024002" }),
    );
    let student = found.get("student").expect("student");
    assert_eq!(
        student.get("rollNumber").and_then(|v| v.as_str()),
        Some("2024002")
    );
    assert_eq!(
        student.get("name").and_then(|v| v.as_str()),
        Some("Anjali Devi")
    );
    assert_eq!(
        found.get("viewerRole").and_then(|v| v.as_str()),
        Some("PARENT")
    );
    let report = found.get("report").expect("report");
    assert_eq!(report.get("overall").and_then(|v| v.as_str()), Some("PASS"));
    assert_eq!(report.get("displayAverage").and_then(|v| v.as_i64()), Some(90));
    assert_eq!(report.get("attendance").and_then(|v| v.as_str()), Some("GOOD"));

    for (i, roll) in ["9999999", "202400", "2024002 ", ""].iter().enumerate() {
        let resp = request(
            &mut stdin,
            &mut reader,
            &format!("miss-{i}"),
            "students.findByRollNumber",
            json!({ "rollNumber": roll }),
        );
        assert_eq!(error_code(&resp), Some("not_found"), "roll {:?}", roll);
    }

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn logout_with_a_stale_token_keeps_the_session() {
    let workspace = temp_dir("mentord-auth-stale-logout");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ws",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let token = login(&mut stdin, &mut reader);

    let rejected = request(
        &mut stdin,
        &mut reader,
        "1",
        "auth.logout",
        json!({ "token": "stale-token" }),
    );
    assert_eq!(error_code(&rejected), Some("unauthorized"));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.list",
        json!({ "token": token }),
    );

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "auth.logout",
        json!({ "token": token }),
    );
    let after = request(
        &mut stdin,
        &mut reader,
        "4",
        "students.list",
        json!({ "token": token }),
    );
    assert_eq!(error_code(&after), Some("unauthorized"));

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn switching_workspace_ends_the_session() {
    let first = temp_dir("mentord-auth-switch-a");
    let second = temp_dir("mentord-auth-switch-b");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ws-a",
        "workspace.select",
        json!({ "path": first.to_string_lossy() }),
    );
    let token = login(&mut stdin, &mut reader);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "ws-b",
        "workspace.select",
        json!({ "path": second.to_string_lossy() }),
    );
    let stale = request(
        &mut stdin,
        &mut reader,
        "1",
        "students.list",
        json!({ "token": token }),
    );
    assert_eq!(error_code(&stale), Some("unauthorized"));
    let health = request_ok(&mut stdin, &mut reader, "2", "health", json!({}));
    assert_eq!(
        health.get("authenticated").and_then(|v| v.as_bool()),
        Some(false)
    );

    let _ = std::fs::remove_dir_all(first);
    let _ = std::fs::remove_dir_all(second);
}
