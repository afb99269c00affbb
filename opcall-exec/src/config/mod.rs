mod source;

pub use source::{EnvResolver, FileResolver, Resolve, ResolveError, Source};

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// Fetch-style credentials mode, forwarded to transports when
/// `with_credentials` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialsMode {
    Include,
    Omit,
    #[default]
    SameOrigin,
}

#[derive(Debug, Clone, Default)]
pub enum AuthStrategy {
    #[default]
    None,
    Bearer(Source<String>),
    Basic {
        username: Source<String>,
        password: Source<String>,
    },
    ApiKey {
        header: String,
        token: Source<String>,
    },
}

pub type PathEncoder = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Host-supplied settings applied to every call.
#[derive(Clone, Default)]
pub struct RequestConfig {
    pub base: String,
    pub with_credentials: bool,
    pub credentials: CredentialsMode,
    pub headers: Option<Source<BTreeMap<String, String>>>,
    pub auth: AuthStrategy,
    /// Replaces the default percent-encoding of path parameter values.
    pub encode_path: Option<PathEncoder>,
}

impl RequestConfig {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    pub fn with_auth(mut self, auth: AuthStrategy) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_headers(mut self, headers: Source<BTreeMap<String, String>>) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn with_credentials(mut self, mode: CredentialsMode) -> Self {
        self.with_credentials = true;
        self.credentials = mode;
        self
    }

    pub fn with_path_encoder(mut self, encoder: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.encode_path = Some(Arc::new(encoder));
        self
    }
}

impl fmt::Debug for RequestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestConfig")
            .field("base", &self.base)
            .field("with_credentials", &self.with_credentials)
            .field("credentials", &self.credentials)
            .field("headers", &self.headers)
            .field("auth", &self.auth)
            .field("encode_path", &self.encode_path.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Shared, mutable [`RequestConfig`].
///
/// Every call reads the configuration once through [`ConfigHandle::current`],
/// so host updates apply to the next call issued. No consistency is promised
/// across separate `update` calls racing with in-flight reads.
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<RequestConfig>>,
}

impl ConfigHandle {
    pub fn new(config: RequestConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn current(&self) -> RequestConfig {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut RequestConfig)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard);
    }

    pub fn replace(&self, config: RequestConfig) {
        self.update(|c| *c = config);
    }
}

impl From<RequestConfig> for ConfigHandle {
    fn from(config: RequestConfig) -> Self {
        Self::new(config)
    }
}
