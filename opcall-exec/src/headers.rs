use std::collections::BTreeMap;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const COOKIE: &str = "Cookie";

/// Sets `name`, replacing any existing entry that matches case-insensitively.
pub fn set_header(map: &mut BTreeMap<String, String>, name: &str, value: impl Into<String>) {
    map.retain(|k, _| !k.eq_ignore_ascii_case(name));
    map.insert(name.to_string(), value.into());
}

pub fn get_header<'a>(map: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    map.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Overlays `overlay` onto `target`; overlay entries win on conflict.
pub fn merge_headers(target: &mut BTreeMap<String, String>, overlay: BTreeMap<String, String>) {
    for (k, v) in overlay {
        set_header(target, &k, v);
    }
}

#[derive(Debug, Clone)]
pub struct RedactedHeaders {
    pub headers: BTreeMap<String, String>,
}

const SENSITIVE: [&str; 3] = ["authorization", "cookie", "set-cookie"];

/// Copy of `headers` safe to log: sensitive values and every header produced
/// from a credential are replaced with `<redacted>`.
pub fn redact_headers(
    headers: &BTreeMap<String, String>,
    credential_header_names: &[String],
) -> RedactedHeaders {
    let mut out = headers.clone();
    for name in SENSITIVE {
        redact_case_insensitive(&mut out, name);
    }
    for name in credential_header_names {
        redact_case_insensitive(&mut out, name);
    }
    RedactedHeaders { headers: out }
}

fn redact_case_insensitive(map: &mut BTreeMap<String, String>, header: &str) {
    for (k, v) in map.iter_mut() {
        if k.eq_ignore_ascii_case(header) {
            *v = "<redacted>".to_string();
        }
    }
}
