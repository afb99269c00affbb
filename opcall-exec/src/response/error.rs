use serde::ser::SerializeStruct;

use crate::response::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Status matched a declared error or error-style result.
    Declared,
    /// Non-success status with no declared mapping.
    Generic,
    /// No HTTP response was obtained; `status` is 0.
    Transport,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: u16,
    pub status_text: String,
    pub url: String,
    pub body: Option<Payload>,
    pub message: String,
}

impl ApiError {
    pub fn name(&self) -> &'static str {
        "ApiError"
    }
}

// Boundary shape: {name, status, statusText, url, body, message}.
impl serde::Serialize for ApiError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ApiError", 6)?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("statusText", &self.status_text)?;
        s.serialize_field("url", &self.url)?;
        s.serialize_field("body", &self.body)?;
        s.serialize_field("message", &self.message)?;
        s.end()
    }
}
