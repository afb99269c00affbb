use crate::types::{OperationDescriptor, ParameterLocation};
use crate::validate::validator::Validator;

pub(crate) fn validate_body(v: &mut Validator, d: &OperationDescriptor) {
    let body_params: Vec<_> = d.parameters_in(ParameterLocation::Body).collect();
    if body_params.len() > 1 {
        v.push("parameters", "at most one body parameter is allowed");
    }
    if !body_params.is_empty() && d.has_parameters_in(ParameterLocation::FormData) {
        v.push(
            "parameters",
            "body and formData parameters are mutually exclusive",
        );
    }

    if let Some(body) = &d.body {
        if body.media_type.trim().is_empty() {
            v.push("body.mediaType", "must not be empty");
        }
        if let Some(source) = &body.source {
            if !body_params.iter().any(|p| &p.name == source) {
                v.push(
                    "body.source",
                    format!("{source} is not a body parameter of this operation"),
                );
            }
        }
    }
}
