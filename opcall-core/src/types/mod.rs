mod descriptor;
mod parameter;
mod result;

pub use descriptor::{BodySpec, OperationDescriptor};
pub use parameter::{ParameterLocation, ParameterSpec, ParameterStyle};
pub use result::{ResultSpec, StatusKey, StatusKeyParseError};
