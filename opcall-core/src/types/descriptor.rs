use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::{ParameterLocation, ParameterSpec, ResultSpec, StatusKey};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid"));

/// Request body declaration: the media type and the BODY parameter feeding it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySpec {
    pub media_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Immutable description of one API operation.
///
/// Built once per operation (in code or loaded from JSON/YAML) and shared
/// read-only, typically behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    pub method: String,

    /// URL template relative to the configured base, with `{name}` placeholders.
    pub path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodySpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub results: BTreeMap<StatusKey, ResultSpec>,

    /// Declared error texts keyed by status code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<u16, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_header: Option<String>,
}

impl OperationDescriptor {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            operation_id: None,
            method: method.into(),
            path: path.into(),
            parameters: Vec::new(),
            body: None,
            results: BTreeMap::new(),
            errors: BTreeMap::new(),
            response_header: None,
        }
    }

    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_body(mut self, media_type: impl Into<String>, source: Option<&str>) -> Self {
        self.body = Some(BodySpec {
            media_type: media_type.into(),
            source: source.map(str::to_string),
        });
        self
    }

    pub fn with_result(mut self, key: StatusKey, result: ResultSpec) -> Self {
        self.results.insert(key, result);
        self
    }

    pub fn with_error(mut self, status: u16, text: impl Into<String>) -> Self {
        self.errors.insert(status, text.into());
        self
    }

    pub fn with_response_header(mut self, header: impl Into<String>) -> Self {
        self.response_header = Some(header.into());
        self
    }

    /// Name used in logs: the operation id, or `METHOD path`.
    pub fn display_name(&self) -> String {
        match &self.operation_id {
            Some(id) => id.clone(),
            None => format!("{} {}", self.method.to_uppercase(), self.path),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameters_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &ParameterSpec> + '_ {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    pub fn has_parameters_in(&self, location: ParameterLocation) -> bool {
        self.parameters_in(location).next().is_some()
    }

    /// Placeholder names in `path`, in order of appearance.
    pub fn path_placeholders(&self) -> Vec<&str> {
        PLACEHOLDER_RE
            .captures_iter(&self.path)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    }

    /// Exact (non-default) declared result for a status code.
    pub fn result_for(&self, status: u16) -> Option<&ResultSpec> {
        self.results.get(&StatusKey::Code(status))
    }

    /// Declared result that describes a successful `status`: the exact entry
    /// when present, otherwise `default` when it is not error-style.
    pub fn success_result(&self, status: u16) -> Option<&ResultSpec> {
        self.result_for(status).or_else(|| {
            self.results
                .get(&StatusKey::Default)
                .filter(|r| !r.error.unwrap_or(false))
        })
    }

    /// The error text mapped to `status`, if the operation declares one.
    pub fn declared_error(&self, status: u16) -> Option<&str> {
        self.errors.get(&status).map(String::as_str)
    }
}
