pub(crate) mod decode;
mod error;

pub use error::{ApiError, ApiErrorKind};

use std::collections::BTreeMap;

use opcall_core::OperationDescriptor;
use serde_json::Value as JsonValue;

use crate::transport::{TransportError, TransportResponse};
use decode::{decode_body, pretty_body};

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(JsonValue),
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn as_json(&self) -> Option<&JsonValue> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Selects what a successful call yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultShape {
    /// Only the decoded body.
    #[default]
    Body,
    /// The full response envelope.
    Raw,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    /// Reason phrase as reported by the transport; empty when it gave none.
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Payload>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallOutput {
    Body(Option<Payload>),
    Raw(RawResponse),
}

impl CallOutput {
    /// The decoded body regardless of shape.
    pub fn body(&self) -> Option<&Payload> {
        match self {
            Self::Body(b) => b.as_ref(),
            Self::Raw(r) => r.body.as_ref(),
        }
    }

    pub fn into_body(self) -> Option<Payload> {
        match self {
            Self::Body(b) => b,
            Self::Raw(r) => r.body,
        }
    }
}

/// Turns a received HTTP response into the call's outcome.
pub fn resolve_response(
    descriptor: &OperationDescriptor,
    url: &url::Url,
    resp: TransportResponse,
    shape: ResultShape,
) -> Result<CallOutput, ApiError> {
    let status = resp.status;
    let success = (200..300).contains(&status);

    let declared = if success {
        descriptor.success_result(status)
    } else {
        descriptor.result_for(status)
    };
    let body = decode_body(&resp, declared.and_then(|r| r.media_type.as_deref()));

    if !success {
        return Err(classify_failure(descriptor, url, &resp, body));
    }

    let body = descriptor
        .response_header
        .as_deref()
        .and_then(|h| resp.header(h))
        .map(|v| Payload::Text(v.to_string()))
        .or(body);

    Ok(match shape {
        ResultShape::Body => CallOutput::Body(body),
        ResultShape::Raw => CallOutput::Raw(RawResponse {
            url: url.to_string(),
            status,
            status_text: resp.status_text.unwrap_or_default(),
            headers: resp.headers,
            body,
        }),
    })
}

fn classify_failure(
    descriptor: &OperationDescriptor,
    url: &url::Url,
    resp: &TransportResponse,
    body: Option<Payload>,
) -> ApiError {
    let status = resp.status;
    let status_text = resp
        .status_text
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let (kind, message) = if let Some(text) = descriptor.declared_error(status) {
        (ApiErrorKind::Declared, format!("Custom message: {text}"))
    } else if let Some(result) = descriptor
        .result_for(status)
        .filter(|r| r.is_error_for(status))
    {
        (ApiErrorKind::Declared, result.description.clone())
    } else {
        (
            ApiErrorKind::Generic,
            format!(
                "Generic Error: status: {status}; status text: {status_text}; body: {}",
                pretty_body(body.as_ref())
            ),
        )
    };

    ApiError {
        kind,
        status,
        status_text,
        url: url.to_string(),
        body,
        message,
    }
}

/// The error for a call that never got an HTTP response.
pub fn transport_failure(url: &url::Url, err: &TransportError) -> ApiError {
    ApiError {
        kind: ApiErrorKind::Transport,
        status: 0,
        status_text: String::new(),
        url: url.to_string(),
        body: None,
        message: err.to_string(),
    }
}
