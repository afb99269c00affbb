use std::path::Path;

use opcall_core::{
    parse_descriptor_list_str, parse_descriptor_str, validate_descriptor, DescriptorFormat,
    OperationDescriptor, ParseError,
};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    format: String,
    operations: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

pub async fn validate_cmd(path: &Path, list: bool, output: OutputArgs) -> i32 {
    let content = match std::fs::read_to_string(path) {
        Ok(v) => v,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", path.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let parsed = if list {
        parse_descriptor_list_str(&content, DescriptorFormat::Auto).map(|p| (p.descriptor, p.format))
    } else {
        parse_descriptor_str(&content, DescriptorFormat::Auto).map(|p| (vec![p.descriptor], p.format))
    };
    let (descriptors, format) = match parsed {
        Ok(v) => v,
        Err(ParseError::Json(e)) => {
            print_error(output.format, output.quiet, &format!("JSON parse failed: {e}"));
            return exit_codes::VALIDATION_FAILED;
        }
        Err(ParseError::Yaml(e)) => {
            print_error(output.format, output.quiet, &format!("YAML parse failed: {e}"));
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let errors = collect_violations(&descriptors);
    let result = ValidateResult {
        valid: errors.is_empty(),
        format: format!("{format:?}"),
        operations: descriptors.len(),
        errors,
    };

    if result.valid {
        if output.format == OutputFormat::Text && !output.quiet {
            println!(
                "ok: {} valid operation descriptor(s) ({:?})",
                result.operations, format
            );
        } else {
            print_result(output.format, output.quiet, &result);
        }
        return exit_codes::SUCCESS;
    }

    if output.format == OutputFormat::Text && !output.quiet {
        eprintln!("error: validation failed");
        for e in &result.errors {
            eprintln!("- {e}");
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::VALIDATION_FAILED
}

fn collect_violations(descriptors: &[OperationDescriptor]) -> Vec<String> {
    let many = descriptors.len() > 1;
    let mut out = Vec::new();
    for (i, d) in descriptors.iter().enumerate() {
        if let Err(err) = validate_descriptor(d) {
            for v in err.violations {
                if many {
                    out.push(format!("[{i}] {} {v}", d.display_name()));
                } else {
                    out.push(v.to_string());
                }
            }
        }
    }
    out
}
