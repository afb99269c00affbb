#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use opcall_exec::{
    ConfigHandle, Executor, RequestConfig, Transport, TransportError, TransportRequest,
    TransportResponse,
};

// Transport double: records requests and replays one scripted outcome.
pub struct RecordingTransport {
    outcome: Result<TransportResponse, TransportError>,
    delay: Option<Duration>,
    sent: AtomicUsize,
    requests: Mutex<Vec<TransportRequest>>,
}

impl RecordingTransport {
    pub fn responding(resp: TransportResponse) -> Self {
        Self {
            outcome: Ok(resp),
            delay: None,
            sent: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: TransportError) -> Self {
        Self {
            outcome: Err(err),
            delay: None,
            sent: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, req: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(req);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

pub fn response(status: u16, status_text: Option<&str>, content_type: Option<&str>, body: &[u8]) -> TransportResponse {
    let mut headers = BTreeMap::new();
    if let Some(ct) = content_type {
        headers.insert("content-type".to_string(), ct.to_string());
    }
    TransportResponse {
        status,
        status_text: status_text.map(str::to_string),
        headers,
        body: body.to_vec(),
    }
}

pub fn json_response(status: u16, status_text: Option<&str>, body: serde_json::Value) -> TransportResponse {
    response(
        status,
        status_text,
        Some("application/json"),
        &serde_json::to_vec(&body).unwrap(),
    )
}

pub fn executor(transport: Arc<RecordingTransport>, config: RequestConfig) -> Executor {
    Executor::new(transport, ConfigHandle::new(config))
}
