#![forbid(unsafe_code)]

//! Runtime for executing declaratively described HTTP operations.
//!
//! Descriptors come from `opcall-core`; this crate turns a descriptor plus
//! call-site arguments into a cancellable HTTP call.

pub mod arguments;
pub mod auth;
pub mod cancel;
pub mod config;
pub mod error;
pub mod executor;
pub mod headers;
pub mod response;
pub mod serialize;
pub mod transport;

pub use crate::arguments::{ArgValue, Arguments};
pub use crate::auth::{resolve_auth, AuthResolutionError};
pub use crate::cancel::{CancelHandle, CancelableOperation, OperationState};
pub use crate::config::{
    AuthStrategy, ConfigHandle, CredentialsMode, EnvResolver, FileResolver, RequestConfig, Resolve,
    ResolveError, Source,
};
pub use crate::error::{CallError, ConstructionError};
pub use crate::executor::{CallOptions, Executor};
pub use crate::response::{ApiError, ApiErrorKind, CallOutput, Payload, RawResponse, ResultShape};
pub use crate::serialize::{serialize_request, SerializedRequest};
pub use crate::transport::{
    ReqwestTransport, Transport, TransportConfig, TransportError, TransportRequest,
    TransportResponse,
};
