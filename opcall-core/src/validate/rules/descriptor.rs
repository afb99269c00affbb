use crate::types::{OperationDescriptor, StatusKey};
use crate::validate::rules::{body, parameters};
use crate::validate::validator::{Validator, METHOD_RE};

pub(crate) fn validate_descriptor(v: &mut Validator, d: &OperationDescriptor) {
    if let Some(id) = &d.operation_id {
        if id.trim().is_empty() {
            v.push("operationId", "must not be empty when present");
        }
    }

    if d.method.trim().is_empty() {
        v.push("method", "must not be empty");
    } else if !METHOD_RE.is_match(&d.method) {
        v.push("method", "must be a valid HTTP method token");
    }

    if !d.path.starts_with('/') {
        v.push("path", "must start with '/'");
    }

    parameters::validate_parameter_list(v, "parameters", d);
    parameters::validate_path_placeholders(v, d);
    body::validate_body(v, d);

    for key in d.results.keys() {
        if let StatusKey::Code(code) = key {
            if !(100..=599).contains(code) {
                v.push(format!("results.{code}"), "status code must be within 100..=599");
            }
        }
    }
    for code in d.errors.keys() {
        if !(100..=599).contains(code) {
            v.push(format!("errors.{code}"), "status code must be within 100..=599");
        }
    }

    if let Some(h) = &d.response_header {
        if h.trim().is_empty() {
            v.push("responseHeader", "must not be empty when present");
        }
    }
}
