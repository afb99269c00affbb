use opcall_core::ValidationError;

use crate::auth::AuthResolutionError;
use crate::response::ApiError;

/// Raised synchronously by `Executor::execute`, before anything is dispatched.
#[derive(Debug, thiserror::Error)]
pub enum ConstructionError {
    #[error(transparent)]
    InvalidDescriptor(#[from] ValidationError),
    #[error("missing required {location} parameter: {name}")]
    MissingParameter { name: String, location: &'static str },
    #[error("path placeholder {{{0}}} has no value")]
    UnboundPlaceholder(String),
    #[error("cannot encode parameter {name}: {reason}")]
    Encoding { name: String, reason: String },
    #[error("invalid request url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid http method: {0:?}")]
    InvalidMethod(String),
}

/// Every way a dispatched call can fail; the rejection of a
/// [`CancelableOperation`](crate::CancelableOperation).
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// A credential or header resolver failed; nothing was sent.
    #[error(transparent)]
    Auth(#[from] AuthResolutionError),
    #[error("Request aborted")]
    Cancelled,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CallError {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
