use opcall_core::{OperationDescriptor, ParameterLocation, ParameterSpec};
use serde_json::Value as JsonValue;

use super::scalar_string;
use crate::arguments::{ArgValue, Arguments};
use crate::error::ConstructionError;
use crate::response::decode::{essence, is_json};
use crate::transport::{FormPart, PartValue, RequestBody};

const OCTET_STREAM: &str = "application/octet-stream";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// The request body and the content type it implies. Multipart bodies carry
/// no content type here; the transport adds the boundary.
pub(super) fn render_body(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
) -> Result<(RequestBody, Option<String>), ConstructionError> {
    if descriptor.has_parameters_in(ParameterLocation::FormData) {
        return render_form(descriptor, arguments);
    }

    let Some(param) = body_parameter(descriptor) else {
        return Ok((RequestBody::Empty, None));
    };
    let Some(arg) = arguments.get(&param.name) else {
        return Ok((RequestBody::Empty, None));
    };
    let declared = descriptor
        .body
        .as_ref()
        .map(|b| b.media_type.as_str())
        .or(param.media_type.as_deref());

    match (arg, declared) {
        (ArgValue::Binary(bytes), media) => Ok((
            RequestBody::Bytes(bytes.clone()),
            Some(media.unwrap_or(OCTET_STREAM).to_string()),
        )),
        (ArgValue::Json(value), Some(media)) if is_json(media) => {
            Ok((json_bytes(&param.name, value)?, Some(media.to_string())))
        }
        (ArgValue::Json(JsonValue::Object(map)), Some(media)) if essence(media) == FORM_URLENCODED => {
            let pairs = map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), scalar_string(v)))
                .collect::<Vec<_>>();
            Ok((RequestBody::Bytes(urlencode(&pairs).into_bytes()), Some(media.to_string())))
        }
        (ArgValue::Json(value), Some(media)) => Ok((
            RequestBody::Bytes(scalar_string(value).into_bytes()),
            Some(media.to_string()),
        )),
        (ArgValue::Json(JsonValue::String(s)), None) => Ok((
            RequestBody::Bytes(s.clone().into_bytes()),
            Some("text/plain".to_string()),
        )),
        (ArgValue::Json(value), None) => Ok((
            json_bytes(&param.name, value)?,
            Some("application/json".to_string()),
        )),
    }
}

fn body_parameter(descriptor: &OperationDescriptor) -> Option<&ParameterSpec> {
    let by_source = descriptor
        .body
        .as_ref()
        .and_then(|b| b.source.as_deref())
        .and_then(|name| descriptor.parameter(name));
    by_source.or_else(|| descriptor.parameters_in(ParameterLocation::Body).next())
}

fn json_bytes(name: &str, value: &JsonValue) -> Result<RequestBody, ConstructionError> {
    serde_json::to_vec(value)
        .map(RequestBody::Bytes)
        .map_err(|e| ConstructionError::Encoding {
            name: name.to_string(),
            reason: e.to_string(),
        })
}

fn render_form(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
) -> Result<(RequestBody, Option<String>), ConstructionError> {
    let media = descriptor
        .body
        .as_ref()
        .map(|b| b.media_type.clone())
        .or_else(|| {
            descriptor
                .parameters_in(ParameterLocation::FormData)
                .find_map(|p| p.media_type.clone())
        })
        .unwrap_or_else(|| MULTIPART.to_string());

    let mut parts = Vec::new();
    for p in descriptor.parameters_in(ParameterLocation::FormData) {
        match arguments.get(&p.name) {
            None => {}
            Some(ArgValue::Binary(bytes)) => parts.push(FormPart {
                name: p.name.clone(),
                value: PartValue::Binary(bytes.clone()),
            }),
            Some(ArgValue::Json(JsonValue::Array(items))) => {
                for item in items.iter().filter(|v| !v.is_null()) {
                    parts.push(FormPart {
                        name: p.name.clone(),
                        value: PartValue::Text(scalar_string(item)),
                    });
                }
            }
            Some(ArgValue::Json(value)) => parts.push(FormPart {
                name: p.name.clone(),
                value: PartValue::Text(scalar_string(value)),
            }),
        }
    }

    if parts.is_empty() {
        return Ok((RequestBody::Empty, None));
    }

    if essence(&media) == FORM_URLENCODED {
        let mut pairs = Vec::with_capacity(parts.len());
        for part in parts {
            let value = match part.value {
                PartValue::Text(s) => s,
                PartValue::Binary(_) => {
                    return Err(ConstructionError::Encoding {
                        name: part.name,
                        reason: "binary values cannot be url-encoded".to_string(),
                    })
                }
            };
            pairs.push((part.name, value));
        }
        return Ok((RequestBody::Bytes(urlencode(&pairs).into_bytes()), Some(media)));
    }

    Ok((RequestBody::Multipart(parts), None))
}

pub(super) fn urlencode(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
