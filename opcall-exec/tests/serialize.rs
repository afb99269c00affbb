use std::collections::BTreeMap;

use opcall_core::{OperationDescriptor, ParameterSpec, ParameterStyle, ResultSpec, StatusKey};
use opcall_exec::transport::{FormPart, PartValue, RequestBody};
use opcall_exec::{serialize_request, Arguments, ConstructionError, RequestConfig};
use serde_json::json;

fn config() -> RequestConfig {
    RequestConfig::new("https://api.example.com/v1/")
}

#[test]
fn substitutes_and_encodes_path_parameters() {
    let d = OperationDescriptor::new("get", "/pets/{petId}/tags/{tag}")
        .with_parameter(ParameterSpec::path("petId"))
        .with_parameter(ParameterSpec::path("tag"));
    let args = Arguments::new().with("petId", 42).with("tag", "a b/c");

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.method, "GET");
    assert_eq!(
        req.url.as_str(),
        "https://api.example.com/v1/pets/42/tags/a%20b%2Fc"
    );
}

#[test]
fn path_arrays_are_comma_joined() {
    let d = OperationDescriptor::new("GET", "/pets/{ids}").with_parameter(ParameterSpec::path("ids"));
    let args = Arguments::new().with("ids", json!([1, 2, 3]));

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.url.path(), "/v1/pets/1,2,3");
}

#[test]
fn custom_path_encoder_replaces_default() {
    let d = OperationDescriptor::new("GET", "/files/{name}").with_parameter(ParameterSpec::path("name"));
    let args = Arguments::new().with("name", "x");
    let cfg = config().with_path_encoder(|s| format!("enc-{s}"));

    let req = serialize_request(&d, &args, &cfg).unwrap();
    assert_eq!(req.url.path(), "/v1/files/enc-x");
}

#[test]
fn missing_required_parameter_is_rejected() {
    let d = OperationDescriptor::new("GET", "/pets/{petId}").with_parameter(ParameterSpec::path("petId"));

    let err = serialize_request(&d, &Arguments::new(), &config()).unwrap_err();
    match err {
        ConstructionError::MissingParameter { name, location } => {
            assert_eq!(name, "petId");
            assert_eq!(location, "path");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn null_counts_as_missing() {
    let d = OperationDescriptor::new("GET", "/search")
        .with_parameter(ParameterSpec::query("q").required());
    let args = Arguments::new().with("q", serde_json::Value::Null);

    let err = serialize_request(&d, &args, &config()).unwrap_err();
    assert!(matches!(err, ConstructionError::MissingParameter { .. }));
}

#[test]
fn unbound_placeholder_is_rejected() {
    let d = OperationDescriptor::new("GET", "/pets/{petId}");

    let err = serialize_request(&d, &Arguments::new(), &config()).unwrap_err();
    assert!(matches!(err, ConstructionError::UnboundPlaceholder(ref n) if n == "petId"));
}

#[test]
fn placeholder_is_not_filled_from_a_query_parameter() {
    let d = OperationDescriptor::new("GET", "/items/{id}").with_parameter(ParameterSpec::query("id"));
    let args = Arguments::new().with("id", "a/b");

    let err = serialize_request(&d, &args, &config()).unwrap_err();
    assert!(matches!(err, ConstructionError::UnboundPlaceholder(ref n) if n == "id"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let d = OperationDescriptor::new("GET", "/pets");
    let err = serialize_request(&d, &Arguments::new(), &RequestConfig::new("")).unwrap_err();
    assert!(matches!(err, ConstructionError::InvalidUrl { .. }));
}

#[test]
fn invalid_method_is_rejected() {
    let d = OperationDescriptor::new("GE T", "/pets");
    let err = serialize_request(&d, &Arguments::new(), &config()).unwrap_err();
    assert!(matches!(err, ConstructionError::InvalidMethod(_)));
}

#[test]
fn single_element_array_query_is_a_plain_pair() {
    let d = OperationDescriptor::new("GET", "/pets").with_parameter(ParameterSpec::query("sort"));
    let args = Arguments::new().with("sort", json!(["location"]));

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.url.query(), Some("sort=location"));
}

#[test]
fn form_style_arrays_repeat_the_key() {
    let d = OperationDescriptor::new("GET", "/pets").with_parameter(ParameterSpec::query("tag"));
    let args = Arguments::new().with("tag", json!(["a", "b"]));

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.url.query(), Some("tag=a&tag=b"));
}

#[test]
fn comma_delimited_arrays_are_joined() {
    let d = OperationDescriptor::new("GET", "/pets")
        .with_parameter(ParameterSpec::query("tag").with_style(ParameterStyle::CommaDelimited));
    let args = Arguments::new().with("tag", json!(["a", "b"]));

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.url.query(), Some("tag=a%2Cb"));
}

#[test]
fn objects_flatten_with_dots_or_brackets() {
    let d = OperationDescriptor::new("GET", "/pets")
        .with_parameter(ParameterSpec::query("filter"))
        .with_parameter(ParameterSpec::query("page").with_style(ParameterStyle::DeepObject));
    let args = Arguments::new()
        .with("filter", json!({"kind": "cat", "owner": {"id": 7}}))
        .with("page", json!({"size": 10}));

    let req = serialize_request(&d, &args, &config()).unwrap();
    let pairs: Vec<(String, String)> = req.url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("filter.kind".to_string(), "cat".to_string()),
            ("filter.owner.id".to_string(), "7".to_string()),
            ("page[size]".to_string(), "10".to_string()),
        ]
    );
}

#[test]
fn absent_and_empty_query_values_are_omitted() {
    let d = OperationDescriptor::new("GET", "/pets")
        .with_parameter(ParameterSpec::query("a"))
        .with_parameter(ParameterSpec::query("b"))
        .with_parameter(ParameterSpec::query("c"));
    let args = Arguments::new().with("b", json!([])).with("c", serde_json::Value::Null);

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.url.query(), None);
}

#[test]
fn header_and_cookie_parameters() {
    let d = OperationDescriptor::new("GET", "/pets")
        .with_parameter(ParameterSpec::header("X-Trace"))
        .with_parameter(ParameterSpec::header("X-Ids"))
        .with_parameter(ParameterSpec::header("X-Meta"))
        .with_parameter(ParameterSpec::cookie("a"))
        .with_parameter(ParameterSpec::cookie("b"));
    let args = Arguments::new()
        .with("X-Trace", "t-1")
        .with("X-Ids", json!([1, 2]))
        .with("X-Meta", json!({"k": "v"}))
        .with("a", 1)
        .with("b", 2);

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.headers.get("X-Trace").map(String::as_str), Some("t-1"));
    assert_eq!(req.headers.get("X-Ids").map(String::as_str), Some("1,2"));
    assert_eq!(req.headers.get("X-Meta").map(String::as_str), Some(r#"{"k":"v"}"#));
    assert_eq!(req.headers.get("Cookie").map(String::as_str), Some("a=1; b=2"));
}

#[test]
fn json_body_is_encoded_structurally() {
    let d = OperationDescriptor::new("POST", "/pets")
        .with_parameter(ParameterSpec::body("pet", "application/json"));
    let pet = json!({"name": "Rex", "tags": ["good"]});
    let args = Arguments::new().with("pet", pet.clone());

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.content_type.as_deref(), Some("application/json"));
    let RequestBody::Bytes(bytes) = req.body else {
        panic!("expected bytes body");
    };
    let decoded: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(decoded, pet);
}

#[test]
fn body_content_type_is_inferred_without_media_type() {
    let d = OperationDescriptor::new("POST", "/notes").with_parameter(ParameterSpec::new(
        "note",
        opcall_core::ParameterLocation::Body,
    ));

    let text = serialize_request(&d, &Arguments::new().with("note", "hi"), &config()).unwrap();
    assert_eq!(text.content_type.as_deref(), Some("text/plain"));
    assert_eq!(text.body, RequestBody::Bytes(b"hi".to_vec()));

    let obj = serialize_request(&d, &Arguments::new().with("note", json!({"a": 1})), &config()).unwrap();
    assert_eq!(obj.content_type.as_deref(), Some("application/json"));

    let bin = serialize_request(&d, &Arguments::new().with_binary("note", vec![0u8, 1]), &config()).unwrap();
    assert_eq!(bin.content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(bin.body, RequestBody::Bytes(vec![0, 1]));
}

#[test]
fn form_parameters_build_multipart_parts() {
    let d = OperationDescriptor::new("POST", "/upload")
        .with_parameter(ParameterSpec::form("file"))
        .with_parameter(ParameterSpec::form("tags"))
        .with_parameter(ParameterSpec::form("meta"));
    let args = Arguments::new()
        .with_binary("file", b"PNG".to_vec())
        .with("tags", json!(["a", "b"]))
        .with("meta", json!({"x": 1}));

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.content_type, None);
    assert_eq!(
        req.body,
        RequestBody::Multipart(vec![
            FormPart { name: "file".into(), value: PartValue::Binary(b"PNG".to_vec()) },
            FormPart { name: "tags".into(), value: PartValue::Text("a".into()) },
            FormPart { name: "tags".into(), value: PartValue::Text("b".into()) },
            FormPart { name: "meta".into(), value: PartValue::Text(r#"{"x":1}"#.into()) },
        ])
    );
}

#[test]
fn urlencoded_form_body() {
    let d = OperationDescriptor::new("POST", "/login")
        .with_body("application/x-www-form-urlencoded", None)
        .with_parameter(ParameterSpec::form("user"))
        .with_parameter(ParameterSpec::form("pass"));
    let args = Arguments::new().with("user", "a b").with("pass", "p&w");

    let req = serialize_request(&d, &args, &config()).unwrap();
    assert_eq!(req.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
    assert_eq!(req.body, RequestBody::Bytes(b"user=a%20b&pass=p%26w".to_vec()));
}

#[test]
fn composed_headers_respect_explicit_content_type_and_accept() {
    let d = OperationDescriptor::new("POST", "/pets")
        .with_parameter(ParameterSpec::body("pet", "application/json"))
        .with_result(
            StatusKey::Code(200),
            ResultSpec::new("ok").with_media_type("application/json"),
        );
    let req = serialize_request(&d, &Arguments::new().with("pet", json!({})), &config()).unwrap();

    let headers = req.compose_headers(BTreeMap::new());
    assert_eq!(headers.get("Content-Type").map(String::as_str), Some("application/json"));
    assert_eq!(headers.get("Accept").map(String::as_str), Some("application/json"));

    let mut base = BTreeMap::new();
    base.insert("content-type".to_string(), "application/vnd.custom+json".to_string());
    let headers = req.compose_headers(base);
    assert_eq!(
        headers.get("content-type").map(String::as_str),
        Some("application/vnd.custom+json")
    );
    assert!(!headers.contains_key("Content-Type"));
}
