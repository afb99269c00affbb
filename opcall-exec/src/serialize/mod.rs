mod body;
mod params;

use std::collections::BTreeMap;

use opcall_core::{OperationDescriptor, StatusKey};
use serde_json::Value as JsonValue;

use crate::arguments::Arguments;
use crate::config::RequestConfig;
use crate::error::ConstructionError;
use crate::headers::{get_header, set_header, ACCEPT, CONTENT_TYPE};
use crate::transport::RequestBody;

/// Everything about a request that can be computed without I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedRequest {
    pub method: String,
    pub url: url::Url,
    /// Header and cookie parameter headers.
    pub headers: BTreeMap<String, String>,
    /// Content type implied by the body; applied only when no header sets one.
    pub content_type: Option<String>,
    /// Media type of the declared success result.
    pub accept: Option<String>,
    pub body: RequestBody,
}

impl SerializedRequest {
    /// Layers this request's headers over `base` (the configured headers).
    pub fn compose_headers(&self, base: BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut out = base;
        for (k, v) in &self.headers {
            set_header(&mut out, k, v.clone());
        }
        if let Some(ct) = &self.content_type {
            if get_header(&out, CONTENT_TYPE).is_none() {
                set_header(&mut out, CONTENT_TYPE, ct.clone());
            }
        }
        if let Some(accept) = &self.accept {
            if get_header(&out, ACCEPT).is_none() {
                set_header(&mut out, ACCEPT, accept.clone());
            }
        }
        out
    }
}

/// Builds the URL, parameter headers, and body for one call.
pub fn serialize_request(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
    config: &RequestConfig,
) -> Result<SerializedRequest, ConstructionError> {
    check_required(descriptor, arguments)?;

    let method = descriptor.method.to_ascii_uppercase();
    reqwest::Method::from_bytes(method.as_bytes())
        .map_err(|_| ConstructionError::InvalidMethod(descriptor.method.clone()))?;

    let path = params::render_path(descriptor, arguments, config)?;
    let query = params::render_query(descriptor, arguments)?;
    let url = build_url(&config.base, &path, &query)?;

    let headers = params::render_headers(descriptor, arguments)?;
    let (body, content_type) = body::render_body(descriptor, arguments)?;

    Ok(SerializedRequest {
        method,
        url,
        headers,
        content_type,
        accept: accept_for(descriptor),
        body,
    })
}

fn check_required(
    descriptor: &OperationDescriptor,
    arguments: &Arguments,
) -> Result<(), ConstructionError> {
    match descriptor
        .parameters
        .iter()
        .find(|p| p.required && !arguments.is_present(&p.name))
    {
        Some(p) => Err(ConstructionError::MissingParameter {
            name: p.name.clone(),
            location: p.location.as_str(),
        }),
        None => Ok(()),
    }
}

fn build_url(
    base: &str,
    path: &str,
    query: &[(String, String)],
) -> Result<url::Url, ConstructionError> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    let mut url = url::Url::parse(&raw).map_err(|e| ConstructionError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    if !query.is_empty() {
        url.set_query(Some(&body::urlencode(query)));
    }
    Ok(url)
}

fn accept_for(descriptor: &OperationDescriptor) -> Option<String> {
    let declared = descriptor
        .results
        .iter()
        .find(|(k, _)| matches!(k, StatusKey::Code(c) if (200..300).contains(c)))
        .map(|(_, r)| r)
        .or_else(|| descriptor.success_result(200));
    declared.and_then(|r| r.media_type.clone())
}

/// Scalar rendering shared by every location: strings verbatim, other
/// values as compact JSON.
pub(crate) fn scalar_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
