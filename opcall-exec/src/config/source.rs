use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ResolveError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ResolveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn from_error(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// A zero-argument, possibly asynchronous producer of a configuration value.
///
/// `Ok(None)` means "no value" and is not an error.
#[async_trait]
pub trait Resolve<T>: Send + Sync {
    async fn resolve(&self) -> Result<Option<T>, ResolveError>;
}

/// A configuration value given either literally or through a resolver that is
/// invoked once per call.
pub enum Source<T> {
    Literal(T),
    Resolver(Arc<dyn Resolve<T>>),
}

impl<T: Clone + Send + Sync + 'static> Source<T> {
    pub async fn resolve(&self) -> Result<Option<T>, ResolveError> {
        match self {
            Self::Literal(v) => Ok(Some(v.clone())),
            Self::Resolver(r) => r.resolve().await,
        }
    }

    pub fn resolver(resolver: impl Resolve<T> + 'static) -> Self {
        Self::Resolver(Arc::new(resolver))
    }

    /// Wraps an async closure as a resolver.
    pub fn resolver_fn<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, ResolveError>> + Send + 'static,
    {
        Self::resolver(FnResolver(f))
    }
}

impl<T: Clone> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(v) => Self::Literal(v.clone()),
            Self::Resolver(r) => Self::Resolver(Arc::clone(r)),
        }
    }
}

// Literal values may be credentials; never print them.
impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(_) => f.write_str("Source::Literal(<redacted>)"),
            Self::Resolver(_) => f.write_str("Source::Resolver(..)"),
        }
    }
}

impl From<&str> for Source<String> {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for Source<String> {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

struct FnResolver<F>(F);

#[async_trait]
impl<T, F, Fut> Resolve<T> for FnResolver<F>
where
    T: Send + 'static,
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<Option<T>, ResolveError>> + Send,
{
    async fn resolve(&self) -> Result<Option<T>, ResolveError> {
        (self.0)().await
    }
}

/// Reads an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvResolver {
    pub var: String,
}

impl EnvResolver {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl Resolve<String> for EnvResolver {
    async fn resolve(&self) -> Result<Option<String>, ResolveError> {
        match std::env::var(&self.var) {
            Ok(v) => Ok(Some(v)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ResolveError::new(format!("{}: {e}", self.var))),
        }
    }
}

/// Reads a file on every call; surrounding whitespace is trimmed.
#[derive(Debug, Clone)]
pub struct FileResolver {
    pub path: PathBuf,
}

impl FileResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Resolve<String> for FileResolver {
    async fn resolve(&self) -> Result<Option<String>, ResolveError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            ResolveError::new(format!("failed to read {}: {e}", self.path.display()))
        })?;
        Ok(Some(contents.trim().to_string()))
    }
}
