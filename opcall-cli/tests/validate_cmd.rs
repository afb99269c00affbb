use assert_cmd::Command;
use tempfile::NamedTempFile;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("tempfile");
    std::io::Write::write_all(&mut f, contents.as_bytes()).expect("write");
    f
}

#[test]
fn validate_command_returns_0_for_valid_descriptor() {
    let doc = r#"
operationId: getPet
method: get
path: /pets/{petId}
parameters:
  - name: petId
    in: path
    required: true
results:
  "200":
    description: ok
    mediaType: application/json
"#;
    let f = write_temp(doc);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    Command::new(bin)
        .args(["validate", f.path().to_string_lossy().as_ref()])
        .assert()
        .success();
}

#[test]
fn validate_command_returns_2_for_invalid_descriptor() {
    let doc = r#"{"method": "get", "path": "pets/{petId}"}"#;
    let f = write_temp(doc);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    let out = Command::new(bin)
        .args(["validate", f.path().to_string_lossy().as_ref(), "--format", "json"])
        .assert()
        .code(2) // VALIDATION_FAILED
        .get_output()
        .stdout
        .clone();

    let result: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(result["valid"], false);
    assert!(!result["errors"].as_array().expect("errors").is_empty());
}

#[test]
fn validate_command_rejects_unparseable_input() {
    let f = write_temp("method: [unclosed");

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    Command::new(bin)
        .args(["validate", f.path().to_string_lossy().as_ref()])
        .assert()
        .code(2);
}

#[test]
fn validate_command_accepts_descriptor_lists() {
    let doc = r#"
- method: get
  path: /pets
- method: post
  path: /pets
  parameters:
    - name: pet
      in: body
      mediaType: application/json
"#;
    let f = write_temp(doc);

    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    let out = Command::new(bin)
        .args(["validate", "--list", f.path().to_string_lossy().as_ref(), "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let result: serde_json::Value = serde_json::from_slice(&out).expect("json output");
    assert_eq!(result["operations"], 2);
}

#[test]
fn validate_command_reports_missing_file() {
    let bin = assert_cmd::cargo::cargo_bin!("opcall");
    Command::new(bin)
        .args(["validate", "/nonexistent/opcall/descriptor.yaml"])
        .assert()
        .code(4); // RUNTIME_ERROR
}
