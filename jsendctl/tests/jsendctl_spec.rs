use assert_cmd::Command;
use httptest::{matchers::*, responders::*, Expectation, Server};
use predicates::str;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn jsendctl() -> Command {
    let mut cmd = Command::cargo_bin("jsendctl").unwrap();
    cmd.env_remove("JSEND_PARSE_POLICY")
        .env_remove("JSEND_BASE_URL")
        .env_remove("JSEND_TIMEOUT_SECS");
    cmd
}

#[test]
fn given_success_envelope_file_when_parse_then_prints_normalized_envelope() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("response.json");
    fs::write(
        &file_path,
        r#"{"status":"success","data":{"id":1},"extra":"dropped"}"#,
    )
    .unwrap();

    let output = jsendctl()
        .args(["parse", file_path.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let printed: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(printed, json!({"status": "success", "data": {"id": 1}}));
}

#[test]
fn given_bare_document_on_stdin_when_parse_strict_then_fails_with_cause() {
    jsendctl()
        .args(["parse", "-"])
        .write_stdin(r#"{"data": null}"#)
        .assert()
        .failure()
        .stderr(str::contains("Failed to parse the response body"))
        .stderr(str::contains("missing required property: status"));
}

#[test]
fn given_bare_document_on_stdin_when_parse_naked_then_wraps_it_as_data() {
    let output = jsendctl()
        .args(["parse", "--policy", "naked"])
        .write_stdin(r#"{"data": null}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let printed: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(printed, json!({"status": "success", "data": {"data": null}}));
}

#[test]
fn given_policy_from_environment_when_parse_then_it_applies() {
    jsendctl()
        .env("JSEND_PARSE_POLICY", "naked")
        .arg("parse")
        .write_stdin("[1, 2, 3]")
        .assert()
        .success()
        .stdout(str::contains("\"status\": \"success\""));
}

#[test]
fn given_malformed_json_when_parse_then_reports_syntax_error() {
    jsendctl()
        .arg("parse")
        .write_stdin("1,2,3")
        .assert()
        .failure()
        .stderr(str::contains("not valid JSON"));
}

#[test]
fn given_valid_error_envelope_when_validate_then_exits_successfully() {
    jsendctl()
        .arg("validate")
        .write_stdin(r#"{"status":"error","message":"down","code":null}"#)
        .assert()
        .success()
        .stdout(str::contains("✓ Valid JSend envelope (status: error)"));
}

#[test]
fn given_fail_without_reason_when_validate_then_exits_with_error() {
    jsendctl()
        .arg("validate")
        .write_stdin(r#"{"status":"fail","data":null}"#)
        .assert()
        .failure()
        .stderr(str::contains("✗ Invalid JSend envelope"));
}

#[test]
fn given_server_response_when_get_then_prints_envelope() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/status")).respond_with(
            status_code(500).body(r#"{"status":"error","message":"overloaded","code":7}"#),
        ),
    );

    let output = jsendctl()
        .args(["get", &format!("http://{}/status", server.addr())])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let printed: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        printed,
        json!({"status": "error", "message": "overloaded", "code": 7})
    );
}

#[test]
fn given_unknown_policy_when_parse_then_usage_error() {
    jsendctl()
        .args(["parse", "--policy", "lenient"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(str::contains("lenient"));
}
