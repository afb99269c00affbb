use std::collections::BTreeMap;

use base64::{engine::general_purpose, Engine as _};
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::config::{AuthStrategy, ResolveError, Source};
use crate::headers::AUTHORIZATION;

#[derive(Debug, thiserror::Error)]
pub enum AuthResolutionError {
    #[error("failed to resolve {credential}: {source}")]
    Resolver {
        credential: &'static str,
        #[source]
        source: ResolveError,
    },
}

impl AuthResolutionError {
    pub fn credential(&self) -> &'static str {
        match self {
            Self::Resolver { credential, .. } => credential,
        }
    }
}

/// Computes the header fragment for `strategy`, invoking each configured
/// resolver exactly once. Empty or absent credentials emit no header.
pub async fn resolve_auth(
    strategy: &AuthStrategy,
) -> Result<BTreeMap<String, String>, AuthResolutionError> {
    let mut out = BTreeMap::new();
    match strategy {
        AuthStrategy::None => {}
        AuthStrategy::Bearer(token) => {
            if let Some(token) = resolve_credential("token", token).await? {
                out.insert(
                    AUTHORIZATION.to_string(),
                    format!("Bearer {}", token.expose_secret()),
                );
            }
        }
        AuthStrategy::Basic { username, password } => {
            let username = resolve_credential("username", username).await?;
            let password = resolve_credential("password", password).await?;
            if let (Some(u), Some(p)) = (username, password) {
                let raw = Zeroizing::new(format!("{}:{}", u.expose_secret(), p.expose_secret()));
                let encoded = general_purpose::STANDARD.encode(raw.as_bytes());
                out.insert(AUTHORIZATION.to_string(), format!("Basic {encoded}"));
            }
        }
        AuthStrategy::ApiKey { header, token } => {
            if let Some(token) = resolve_credential("token", token).await? {
                out.insert(header.clone(), token.expose_secret().to_string());
            }
        }
    }
    Ok(out)
}

async fn resolve_credential(
    credential: &'static str,
    source: &Source<String>,
) -> Result<Option<SecretString>, AuthResolutionError> {
    let value = source
        .resolve()
        .await
        .map_err(|source| AuthResolutionError::Resolver { credential, source })?;
    Ok(value.filter(|v| !v.is_empty()).map(SecretString::from))
}
