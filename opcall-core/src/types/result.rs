use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};

/// Key of the `results` map: an HTTP status code or the `default` catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusKey {
    Code(u16),
    Default,
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(c) => write!(f, "{c}"),
            Self::Default => f.write_str("default"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status key: {0} (expected a status code or \"default\")")]
pub struct StatusKeyParseError(pub String);

impl FromStr for StatusKey {
    type Err = StatusKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(Self::Default);
        }
        s.parse::<u16>()
            .map(Self::Code)
            .map_err(|_| StatusKeyParseError(s.to_string()))
    }
}

impl serde::Serialize for StatusKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for StatusKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatusKeyVisitor;

        impl Visitor<'_> for StatusKeyVisitor {
            type Value = StatusKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a status code or \"default\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<StatusKey, E> {
                u16::try_from(v)
                    .map(StatusKey::Code)
                    .map_err(|_| E::custom(format!("status code out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<StatusKey, E> {
                u16::try_from(v)
                    .map(StatusKey::Code)
                    .map_err(|_| E::custom(format!("status code out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<StatusKey, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(StatusKeyVisitor)
    }
}

/// A declared result of an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSpec {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// Marks the result as error-style. When omitted, any status >= 400 is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
}

impl ResultSpec {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            media_type: None,
            error: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn is_error_for(&self, status: u16) -> bool {
        self.error.unwrap_or(status >= 400)
    }
}
