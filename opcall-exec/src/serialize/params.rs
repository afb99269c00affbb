use std::collections::BTreeMap;

use opcall_core::{OperationDescriptor, ParameterLocation, ParameterStyle};
use serde_json::Value as JsonValue;

use super::scalar_string;
use crate::arguments::{ArgValue, Arguments};
use crate::config::RequestConfig;
use crate::error::ConstructionError;
use crate::headers::{set_header, COOKIE};

fn json_arg<'a>(
    arguments: &'a Arguments,
    name: &str,
) -> Result<Option<&'a JsonValue>, ConstructionError> {
    match arguments.get(name) {
        None => Ok(None),
        Some(ArgValue::Json(v)) => Ok(Some(v)),
        Some(ArgValue::Binary(_)) => Err(ConstructionError::Encoding {
            name: name.to_string(),
            reason: "binary values are only allowed in body and formData parameters".to_string(),
        }),
    }
}

/// Substitutes every `{name}` placeholder with its encoded value.
pub(super) fn render_path(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
    config: &RequestConfig,
) -> Result<String, ConstructionError> {
    let encode = |s: &str| match &config.encode_path {
        Some(f) => f(s),
        None => urlencoding::encode(s).into_owned(),
    };

    let mut path = descriptor.path.clone();
    for name in descriptor.path_placeholders() {
        // Only a declared path parameter may fill a placeholder.
        let declared = descriptor
            .parameters_in(ParameterLocation::Path)
            .any(|p| p.name == name);
        let value = if declared { json_arg(arguments, name)? } else { None };
        let value = value.ok_or_else(|| ConstructionError::UnboundPlaceholder(name.to_string()))?;

        let rendered = match value {
            JsonValue::Array(items) => items
                .iter()
                .map(|v| encode(&scalar_string(v)))
                .collect::<Vec<_>>()
                .join(","),
            JsonValue::Object(map) => map
                .iter()
                .flat_map(|(k, v)| [encode(k), encode(&scalar_string(v))])
                .collect::<Vec<_>>()
                .join(","),
            other => encode(&scalar_string(other)),
        };
        path = path.replace(&format!("{{{name}}}"), &rendered);
    }
    Ok(path)
}

/// Query pairs in parameter order, not yet percent-encoded.
pub(super) fn render_query(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
) -> Result<Vec<(String, String)>, ConstructionError> {
    let mut out = Vec::new();
    for p in descriptor.parameters_in(ParameterLocation::Query) {
        if let Some(value) = json_arg(arguments, &p.name)? {
            push_query(&mut out, &p.name, value, p.effective_style());
        }
    }
    Ok(out)
}

fn push_query(out: &mut Vec<(String, String)>, key: &str, value: &JsonValue, style: ParameterStyle) {
    match value {
        JsonValue::Null => {}
        JsonValue::Array(items) => {
            let items: Vec<&JsonValue> = items.iter().filter(|v| !v.is_null()).collect();
            if items.is_empty() {
                return;
            }
            match style {
                ParameterStyle::Form | ParameterStyle::DeepObject => {
                    for item in items {
                        out.push((key.to_string(), scalar_string(item)));
                    }
                }
                ParameterStyle::Simple | ParameterStyle::CommaDelimited => {
                    let joined = items
                        .into_iter()
                        .map(scalar_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    out.push((key.to_string(), joined));
                }
            }
        }
        JsonValue::Object(map) => {
            for (sub, v) in map {
                let nested = match style {
                    ParameterStyle::DeepObject => format!("{key}[{sub}]"),
                    _ => format!("{key}.{sub}"),
                };
                push_query(out, &nested, v, style);
            }
        }
        scalar => out.push((key.to_string(), scalar_string(scalar))),
    }
}

/// Header parameters plus one folded `Cookie` header.
pub(super) fn render_headers(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
) -> Result<BTreeMap<String, String>, ConstructionError> {
    let mut headers = BTreeMap::new();
    for p in descriptor.parameters_in(ParameterLocation::Header) {
        if let Some(value) = json_arg(arguments, &p.name)? {
            set_header(&mut headers, &p.name, header_value(value));
        }
    }

    let mut cookies = Vec::new();
    for p in descriptor.parameters_in(ParameterLocation::Cookie) {
        if let Some(value) = json_arg(arguments, &p.name)? {
            cookies.push(format!("{}={}", p.name, header_value(value)));
        }
    }
    if !cookies.is_empty() {
        set_header(&mut headers, COOKIE, cookies.join("; "));
    }
    Ok(headers)
}

fn header_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Array(items) => items.iter().map(scalar_string).collect::<Vec<_>>().join(","),
        other => scalar_string(other),
    }
}
