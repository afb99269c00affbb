use serde::de::DeserializeOwned;

use crate::error::ParseError;
use crate::types::OperationDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedDescriptor<T = OperationDescriptor> {
    pub descriptor: T,
    pub format: DescriptorFormat,
}

pub fn parse_descriptor_str(
    input: &str,
    format: DescriptorFormat,
) -> Result<ParsedDescriptor, ParseError> {
    parse_str(input, format)
}

/// Parses a file holding several descriptors (a JSON/YAML sequence).
pub fn parse_descriptor_list_str(
    input: &str,
    format: DescriptorFormat,
) -> Result<ParsedDescriptor<Vec<OperationDescriptor>>, ParseError> {
    parse_str(input, format)
}

fn parse_str<T: DeserializeOwned>(
    input: &str,
    format: DescriptorFormat,
) -> Result<ParsedDescriptor<T>, ParseError> {
    match format {
        DescriptorFormat::Json => Ok(ParsedDescriptor {
            descriptor: serde_json::from_str::<T>(input)?,
            format,
        }),
        DescriptorFormat::Yaml => Ok(ParsedDescriptor {
            descriptor: serde_yaml::from_str::<T>(input)?,
            format,
        }),
        DescriptorFormat::Auto => parse_auto(input),
    }
}

fn parse_auto<T: DeserializeOwned>(input: &str) -> Result<ParsedDescriptor<T>, ParseError> {
    // JSON always starts with `{` or `[` after trimming.
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return match serde_json::from_str::<T>(input) {
            Ok(descriptor) => Ok(ParsedDescriptor {
                descriptor,
                format: DescriptorFormat::Json,
            }),
            Err(e) => match serde_yaml::from_str::<T>(input) {
                Ok(descriptor) => Ok(ParsedDescriptor {
                    descriptor,
                    format: DescriptorFormat::Yaml,
                }),
                // Report the JSON error since JSON was tried first.
                Err(_) => Err(ParseError::Json(e)),
            },
        };
    }

    match serde_yaml::from_str::<T>(input) {
        Ok(descriptor) => Ok(ParsedDescriptor {
            descriptor,
            format: DescriptorFormat::Yaml,
        }),
        Err(e) => {
            if let Ok(descriptor) = serde_json::from_str::<T>(input) {
                return Ok(ParsedDescriptor {
                    descriptor,
                    format: DescriptorFormat::Json,
                });
            }
            Err(ParseError::Yaml(e))
        }
    }
}
