/// Where a parameter value is placed in the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    Body,
    #[serde(alias = "form")]
    FormData,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::FormData => "formData",
        }
    }
}

/// Serialization mode for composite (array/object) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterStyle {
    /// Comma-joined, used for path and header values.
    Simple,
    /// Exploded form style: `key=a&key=b`.
    Form,
    /// `key=a,b`
    CommaDelimited,
    /// `key[sub]=value`
    DeepObject,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ParameterStyle>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            style: None,
            required: false,
            media_type: None,
        }
    }

    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Path).required()
    }

    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Query)
    }

    pub fn header(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Header)
    }

    pub fn cookie(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Cookie)
    }

    pub fn body(name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Body).with_media_type(media_type)
    }

    pub fn form(name: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::FormData)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_style(mut self, style: ParameterStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// The declared style, or the location's default when none was declared.
    pub fn effective_style(&self) -> ParameterStyle {
        match (self.style, self.location) {
            (Some(s), _) => s,
            (None, ParameterLocation::Query | ParameterLocation::FormData) => ParameterStyle::Form,
            (None, _) => ParameterStyle::Simple,
        }
    }
}
