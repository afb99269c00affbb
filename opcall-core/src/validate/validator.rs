use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ValidationError, Violation};
use crate::types::OperationDescriptor;

use super::rules;

// RFC 9110 token characters.
pub(crate) static METHOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9!#$%&'*+\-.^_`|~]+$").expect("valid"));

pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }

    pub fn validate_descriptor(&mut self, descriptor: &OperationDescriptor) {
        rules::descriptor::validate_descriptor(self, descriptor);
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }
}
