use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{PartValue, RequestBody, Transport, TransportError, TransportRequest, TransportResponse};

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub user_agent: String,
    pub max_response_bytes: usize,
    pub follow_redirects: bool,
    /// Total time allowed for one request, body included.
    pub timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("opcall/", env!("CARGO_PKG_VERSION")).to_string(),
            max_response_bytes: 4 * 1024 * 1024,
            follow_redirects: true,
            timeout: None,
        }
    }
}

/// [`Transport`] backed by `reqwest`.
///
/// reqwest keeps no ambient credential store, so the request's credentials
/// mode does not change what is sent.
pub struct ReqwestTransport {
    client: reqwest::Client,
    max_response_bytes: usize,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let redirect = if config.follow_redirects {
            reqwest::redirect::Policy::default()
        } else {
            reqwest::redirect::Policy::none()
        };
        let mut builder = reqwest::Client::builder()
            .redirect(redirect)
            .user_agent(config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            max_response_bytes: config.max_response_bytes,
        })
    }

    pub fn from_client(client: reqwest::Client, max_response_bytes: usize) -> Self {
        Self {
            client,
            max_response_bytes,
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        // Client creation only fails when the TLS backend cannot initialise.
        Self::new(TransportConfig::default()).unwrap_or_else(|e| {
            panic!("failed to create reqwest HTTP client: {e}. This is a bug - please report it.");
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, TransportError> {
        let method: reqwest::Method = req
            .method
            .parse()
            .map_err(|e: <reqwest::Method as std::str::FromStr>::Err| TransportError::Other(e.to_string()))?;
        let mut rb = self.client.request(method, req.url);

        let multipart = matches!(req.body, RequestBody::Multipart(_));
        for (k, v) in req.headers {
            // reqwest sets the multipart content type with its boundary.
            if multipart && k.eq_ignore_ascii_case("content-type") {
                continue;
            }
            rb = rb.header(k, v);
        }

        rb = match req.body {
            RequestBody::Empty => rb,
            RequestBody::Bytes(bytes) => rb.body(bytes),
            RequestBody::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match part.value {
                        PartValue::Text(text) => form.text(part.name, text),
                        PartValue::Binary(bytes) => {
                            let file = reqwest::multipart::Part::bytes(bytes).file_name(part.name.clone());
                            form.part(part.name, file)
                        }
                    };
                }
                rb.multipart(form)
            }
        };

        let mut resp = rb.send().await.map_err(map_reqwest_error)?;
        let status = resp.status();
        // hyper records the phrase only when it differs from the canonical one.
        let status_text = resp
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|r| std::str::from_utf8(r.as_bytes()).ok())
            .or_else(|| status.canonical_reason())
            .map(str::to_string);

        // Repeated headers are folded into one comma-separated value.
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers
                    .entry(k.to_string())
                    .and_modify(|existing| {
                        existing.push_str(", ");
                        existing.push_str(s);
                    })
                    .or_insert_with(|| s.to_string());
            }
        }

        // Read the body in chunks so the size cap applies before buffering everything.
        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(map_reqwest_error)? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(TransportError::ResponseTooLarge {
                    max_bytes: self.max_response_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        return TransportError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return TransportError::Network(e.to_string());
    }
    TransportError::Other(e.to_string())
}
