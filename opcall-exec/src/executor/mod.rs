use std::collections::BTreeMap;
use std::sync::Arc;

use opcall_core::{validate_descriptor, OperationDescriptor};
use tracing::{debug, warn};

use crate::arguments::Arguments;
use crate::auth::{resolve_auth, AuthResolutionError};
use crate::cancel::CancelableOperation;
use crate::config::{ConfigHandle, RequestConfig};
use crate::error::{CallError, ConstructionError};
use crate::headers::{merge_headers, redact_headers};
use crate::response::{resolve_response, transport_failure, CallOutput, ResultShape};
use crate::serialize::{serialize_request, SerializedRequest};
use crate::transport::{Transport, TransportRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    pub result: ResultShape,
}

impl CallOptions {
    pub fn raw() -> Self {
        Self {
            result: ResultShape::Raw,
        }
    }
}

/// Runs operation descriptors against a [`Transport`] using the shared
/// request configuration.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    config: ConfigHandle,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, config: ConfigHandle) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// Serializes the call and returns it as a live, not yet dispatched
    /// operation. Descriptor, argument and URL problems are reported here,
    /// synchronously.
    pub fn execute(
        &self,
        descriptor: Arc<OperationDescriptor>,
        arguments: Arguments,
        options: CallOptions,
    ) -> Result<CancelableOperation<CallOutput>, ConstructionError> {
        validate_descriptor(&descriptor)?;
        let config = self.config.current();
        let request = serialize_request(&descriptor, &arguments, &config)?;

        let name = descriptor.display_name();
        let transport = Arc::clone(&self.transport);
        let op = CancelableOperation::new(run_call(transport, descriptor, config, request, options));

        op.on_cancel(move || debug!(operation = %name, "call cancelled"));
        Ok(op)
    }
}

async fn run_call(
    transport: Arc<dyn Transport>,
    descriptor: Arc<OperationDescriptor>,
    config: RequestConfig,
    request: SerializedRequest,
    options: CallOptions,
) -> Result<CallOutput, CallError> {
    let base_headers = match &config.headers {
        Some(source) => source
            .resolve()
            .await
            .map_err(|source| AuthResolutionError::Resolver {
                credential: "headers",
                source,
            })?
            .unwrap_or_default(),
        None => BTreeMap::new(),
    };

    let mut headers = request.compose_headers(base_headers);
    let auth = resolve_auth(&config.auth).await?;
    let credential_headers: Vec<String> = auth.keys().cloned().collect();
    merge_headers(&mut headers, auth);

    let name = descriptor.display_name();
    debug!(
        operation = %name,
        method = %request.method,
        url = %request.url,
        headers = ?redact_headers(&headers, &credential_headers).headers,
        "dispatching request"
    );

    let url = request.url.clone();
    let outcome = transport
        .send(TransportRequest {
            method: request.method,
            url: request.url,
            headers,
            body: request.body,
            credentials: config.with_credentials.then_some(config.credentials),
        })
        .await;

    match outcome {
        Ok(resp) => {
            debug!(operation = %name, status = resp.status, "response received");
            Ok(resolve_response(&descriptor, &url, resp, options.result)?)
        }
        Err(err) => {
            warn!(operation = %name, url = %url, error = %err, "transport failure");
            Err(transport_failure(&url, &err).into())
        }
    }
}
