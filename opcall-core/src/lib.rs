#![forbid(unsafe_code)]

//! Operation descriptor model for the opcall runtime.
//!
//! Descriptors are produced by an external model builder (or loaded from
//! JSON/YAML here) and consumed read-only by `opcall-exec`.

pub mod error;
pub mod parser;
pub mod types;
pub mod validate;

pub use crate::error::{ParseError, ValidationError, Violation};
pub use crate::parser::{
    parse_descriptor_list_str, parse_descriptor_str, DescriptorFormat, ParsedDescriptor,
};
pub use crate::types::{
    BodySpec, OperationDescriptor, ParameterLocation, ParameterSpec, ParameterStyle, ResultSpec,
    StatusKey,
};
pub use crate::validate::{validate_descriptor, Validate};
