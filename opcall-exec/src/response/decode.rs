use crate::response::Payload;
use crate::transport::TransportResponse;

/// Media-type essence: lowercased, parameters stripped.
pub(crate) fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub(crate) fn is_json(media_type: &str) -> bool {
    let m = essence(media_type);
    m == "application/json" || m.ends_with("+json") || m.ends_with("/json")
}

fn is_text(media_type: &str) -> bool {
    let m = essence(media_type);
    m.starts_with("text/")
        || m == "application/xml"
        || m.ends_with("+xml")
        || m == "application/x-www-form-urlencoded"
        || m == "application/javascript"
}

/// Decodes the response body by the declared media type, falling back to the
/// response `Content-Type`. Empty bodies and 204 yield no payload.
pub(crate) fn decode_body(resp: &TransportResponse, declared: Option<&str>) -> Option<Payload> {
    if resp.status == 204 || resp.body.is_empty() {
        return None;
    }
    let media = declared.or_else(|| resp.header("content-type"));
    let bytes = &resp.body;

    match media {
        Some(m) if is_json(m) => Some(
            serde_json::from_slice(bytes)
                .map(Payload::Json)
                .unwrap_or_else(|_| text_or_binary(bytes)),
        ),
        Some(m) if is_text(m) => Some(text_or_binary(bytes)),
        Some(_) => Some(Payload::Binary(bytes.clone())),
        None => Some(text_or_binary(bytes)),
    }
}

fn text_or_binary(bytes: &[u8]) -> Payload {
    match std::str::from_utf8(bytes) {
        Ok(s) => Payload::Text(s.to_string()),
        Err(_) => Payload::Binary(bytes.to_vec()),
    }
}

/// Body rendering used in generic error messages.
pub(crate) fn pretty_body(body: Option<&Payload>) -> String {
    match body {
        None => "undefined".to_string(),
        Some(Payload::Json(v)) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
        Some(Payload::Text(s)) => serde_json::Value::String(s.clone()).to_string(),
        Some(Payload::Binary(b)) => format!("<{} bytes>", b.len()),
    }
}
