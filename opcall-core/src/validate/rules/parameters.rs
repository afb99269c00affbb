use std::collections::HashSet;

use crate::types::{OperationDescriptor, ParameterLocation, ParameterStyle};
use crate::validate::validator::Validator;

pub(crate) fn validate_parameter_list(v: &mut Validator, path: &str, d: &OperationDescriptor) {
    // Arguments are keyed by name alone, so names are unique across locations.
    let mut seen = HashSet::<&str>::new();
    for (idx, p) in d.parameters.iter().enumerate() {
        let ipath = format!("{path}[{idx}]");
        if p.name.trim().is_empty() {
            v.push(format!("{ipath}.name"), "must not be empty");
        }
        if !seen.insert(p.name.as_str()) {
            v.push(ipath.as_str(), format!("duplicate parameter name {}", p.name));
        }

        match p.location {
            ParameterLocation::Path => {
                if !p.required {
                    v.push(format!("{ipath}.required"), "path parameters must be required");
                }
            }
            ParameterLocation::Header | ParameterLocation::Cookie => {
                if p.style == Some(ParameterStyle::DeepObject) {
                    v.push(
                        format!("{ipath}.style"),
                        "deepObject style is only supported for query parameters",
                    );
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn validate_path_placeholders(v: &mut Validator, d: &OperationDescriptor) {
    let placeholders = d.path_placeholders();
    for name in &placeholders {
        let bound = d
            .parameters_in(ParameterLocation::Path)
            .any(|p| p.name == *name);
        if !bound {
            v.push("path", format!("placeholder {{{name}}} has no path parameter"));
        }
    }
    for (idx, p) in d.parameters.iter().enumerate() {
        if p.location == ParameterLocation::Path && !placeholders.contains(&p.name.as_str()) {
            v.push(
                format!("parameters[{idx}]"),
                format!("path parameter {} does not appear in the path template", p.name),
            );
        }
    }
}
