use std::collections::BTreeMap;
use std::path::Path;

use opcall_core::{parse_descriptor_str, DescriptorFormat, OperationDescriptor, Validate};
use opcall_exec::{
    Arguments, AuthStrategy, CredentialsMode, EnvResolver, FileResolver, RequestConfig, Source,
};

use crate::exit_codes;
use crate::{AuthArgs, CallArgs, ConnectionArgs};

/// A CLI setup problem paired with the exit code it maps to.
pub struct SetupError {
    pub code: i32,
    pub message: String,
}

impl SetupError {
    fn runtime(message: impl Into<String>) -> Self {
        Self {
            code: exit_codes::RUNTIME_ERROR,
            message: message.into(),
        }
    }

    fn validation(message: impl Into<String>) -> Self {
        Self {
            code: exit_codes::VALIDATION_FAILED,
            message: message.into(),
        }
    }
}

pub fn load_descriptor(path: &Path) -> Result<OperationDescriptor, SetupError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SetupError::runtime(format!("failed to read {}: {e}", path.display())))?;
    let parsed = parse_descriptor_str(&content, DescriptorFormat::Auto)
        .map_err(|e| SetupError::validation(e.to_string()))?;

    parsed.descriptor.validate().map_err(|err| {
        let details: Vec<String> = err.violations.iter().map(ToString::to_string).collect();
        SetupError::validation(format!("{err}: {}", details.join("; ")))
    })?;
    Ok(parsed.descriptor)
}

pub fn build_arguments(call: &CallArgs) -> Result<Arguments, SetupError> {
    let mut args = Arguments::new();

    if let Some(path) = &call.args_file {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SetupError::runtime(format!("failed to read arguments: {e}")))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .map_err(|_| SetupError::runtime("arguments file is neither valid JSON nor YAML"))?;
        let serde_json::Value::Object(map) = value else {
            return Err(SetupError::runtime("arguments file must hold an object"));
        };
        for (k, v) in map {
            args.set(k, v);
        }
    }

    for s in &call.args {
        let (k, v) = split_pair(s, "--arg")?;
        let value = serde_json::from_str(v).unwrap_or_else(|_| serde_json::Value::String(v.to_string()));
        args.set(k, value);
    }

    for s in &call.files {
        let (k, path) = split_pair(s, "--file")?;
        let bytes = std::fs::read(path)
            .map_err(|e| SetupError::runtime(format!("failed to read {path}: {e}")))?;
        args.set_binary(k, bytes);
    }

    Ok(args)
}

pub fn build_request_config(
    connection: &ConnectionArgs,
    auth: &AuthArgs,
) -> Result<RequestConfig, SetupError> {
    let mut config = RequestConfig::new(connection.base.clone()).with_auth(build_auth(auth));

    if !connection.headers.is_empty() {
        let mut headers = BTreeMap::new();
        for s in &connection.headers {
            let (k, v) = split_pair(s, "--header")?;
            headers.insert(k.to_string(), v.to_string());
        }
        config = config.with_headers(Source::Literal(headers));
    }

    if let Some(mode) = &connection.credentials {
        let mode = match mode.as_str() {
            "include" => CredentialsMode::Include,
            "omit" => CredentialsMode::Omit,
            "same-origin" => CredentialsMode::SameOrigin,
            other => return Err(SetupError::runtime(format!("unknown credentials mode: {other}"))),
        };
        config = config.with_credentials(mode);
    }

    Ok(config)
}

fn build_auth(auth: &AuthArgs) -> AuthStrategy {
    if let (Some(username), Some(password)) = (&auth.username, &auth.password) {
        return AuthStrategy::Basic {
            username: Source::from(username.as_str()),
            password: Source::from(password.as_str()),
        };
    }

    let token: Option<Source<String>> = if let Some(t) = &auth.token {
        Some(Source::from(t.as_str()))
    } else if let Some(var) = &auth.token_env {
        Some(Source::resolver(EnvResolver::new(var.clone())))
    } else {
        auth.token_file
            .as_ref()
            .map(|p| Source::resolver(FileResolver::new(p.clone())))
    };

    match (token, &auth.api_key_header) {
        (None, _) => AuthStrategy::None,
        (Some(token), Some(header)) => AuthStrategy::ApiKey {
            header: header.clone(),
            token,
        },
        (Some(token), None) => AuthStrategy::Bearer(token),
    }
}

fn split_pair<'a>(s: &'a str, flag: &str) -> Result<(&'a str, &'a str), SetupError> {
    s.split_once('=')
        .ok_or_else(|| SetupError::runtime(format!("{flag} expects NAME=VALUE, got {s:?}")))
}
