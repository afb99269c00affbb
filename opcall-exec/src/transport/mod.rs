mod http;

pub use self::http::{ReqwestTransport, TransportConfig};

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CredentialsMode;
use crate::headers::get_header;

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Encoded bytes; the content type travels in the request headers.
    Bytes(Vec<u8>),
    /// Multipart form; the transport sets the boundary content type.
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: String,
    pub url: url::Url,
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
    /// Set only when the host enabled `with_credentials`.
    pub credentials: Option<CredentialsMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Reason phrase, when the transport knows one.
    pub status_text: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        get_header(&self.headers, name)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("response too large (>{max_bytes} bytes)")]
    ResponseTooLarge { max_bytes: usize },
    #[error("http error: {0}")]
    Other(String),
}

/// The network primitive the runtime is written against.
///
/// Dropping the future returned by `send` aborts the request; implementations
/// must not send anything before the future is first polled.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, TransportError> {
        (**self).send(req).await
    }
}
