mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::OperationDescriptor;
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for OperationDescriptor {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_descriptor(self)
    }
}

/// Checks the construction invariants the runtime relies on without
/// re-checking them per call.
pub fn validate_descriptor(descriptor: &OperationDescriptor) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_descriptor(descriptor);
    v.finish()
}
