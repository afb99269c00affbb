use assert_cmd::Command;
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    std::io::Write::write_all(&mut f, contents.as_bytes()).expect("write");
    f
}

const GET_PET: &str = r#"
operationId: getPet
method: get
path: /pets/{petId}
parameters:
  - name: petId
    in: path
    required: true
  - name: fields
    in: query
errors:
  500: Internal Server Error
"#;

// assert_cmd blocks, so the mock server needs a worker thread of its own.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn call_prints_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/7"))
        .and(query_param("fields", "name"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "name": "Rex"})))
        .expect(1)
        .mount(&server)
        .await;
    let f = write_temp(GET_PET);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    let out = Command::new(bin)
        .args([
            "call",
            f.path().to_string_lossy().as_ref(),
            "--base",
            &server.uri(),
            "--arg",
            "petId=7",
            "--arg",
            "fields=[\"name\"]",
            "--token",
            "t0ken",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let body: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(body, json!({"id": 7, "name": "Rex"}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn call_reports_declared_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;
    let f = write_temp(GET_PET);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    let err = Command::new(bin)
        .args([
            "call",
            f.path().to_string_lossy().as_ref(),
            "--base",
            &server.uri(),
            "--arg",
            "petId=1",
            "--format",
            "json",
        ])
        .assert()
        .code(3) // CALL_FAILED
        .get_output()
        .stderr
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&err).expect("json error");
    assert_eq!(value["error"]["name"], "ApiError");
    assert_eq!(value["error"]["status"], 500);
    assert_eq!(value["error"]["message"], "Custom message: Internal Server Error");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn call_raw_prints_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain"))
        .mount(&server)
        .await;
    let f = write_temp(GET_PET);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    let out = Command::new(bin)
        .args([
            "call",
            f.path().to_string_lossy().as_ref(),
            "--base",
            &server.uri(),
            "--arg",
            "petId=2",
            "--raw",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let raw: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(raw["status"], 200);
    assert_eq!(raw["statusText"], "OK");
    assert_eq!(raw["body"], "plain");
    assert_eq!(raw["url"], format!("{}/pets/2", server.uri()));
}

#[test]
fn missing_required_argument_fails_before_sending() {
    let f = write_temp(GET_PET);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    Command::new(bin)
        .args([
            "call",
            f.path().to_string_lossy().as_ref(),
            "--base",
            "http://127.0.0.1:9",
        ])
        .assert()
        .code(2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timeout_cancels_the_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pets/3"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(10)))
        .mount(&server)
        .await;
    let f = write_temp(GET_PET);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    let err = Command::new(bin)
        .args([
            "call",
            f.path().to_string_lossy().as_ref(),
            "--base",
            &server.uri(),
            "--arg",
            "petId=3",
            "--timeout-ms",
            "200",
        ])
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();

    assert!(String::from_utf8_lossy(&err).contains("Request aborted"));
}
