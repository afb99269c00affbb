use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use opcall_core::OperationDescriptor;
use opcall_exec::{
    Arguments, CallError, CallOptions, CallOutput, ConfigHandle, Executor, Payload, RequestConfig,
    ReqwestTransport, ResultShape, TransportConfig,
};
use tracing::info;

use super::config::{build_arguments, build_request_config, load_descriptor, SetupError};
use crate::exit_codes;
use crate::output::{print_error, print_error_value, print_result, OutputFormat};
use crate::{AuthArgs, CallArgs, ConnectionArgs, OutputArgs};

pub async fn call_cmd(
    path: &Path,
    call: CallArgs,
    connection: ConnectionArgs,
    auth: AuthArgs,
    output: OutputArgs,
) -> i32 {
    let (descriptor, arguments, config) = match prepare(path, &call, &connection, &auth) {
        Ok(v) => v,
        Err(e) => {
            print_error(output.format, output.quiet, &e.message);
            return e.code;
        }
    };

    let transport = match ReqwestTransport::new(TransportConfig {
        max_response_bytes: connection.max_response_bytes,
        ..TransportConfig::default()
    }) {
        Ok(t) => t,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let executor = Executor::new(Arc::new(transport), ConfigHandle::new(config));
    let options = CallOptions {
        result: if call.raw { ResultShape::Raw } else { ResultShape::Body },
    };

    let op = match executor.execute(Arc::new(descriptor), arguments, options) {
        Ok(op) => op,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    if let Some(ms) = connection.timeout_ms {
        let handle = op.cancel_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            info!(timeout_ms = ms, "call timed out, cancelling");
            handle.cancel();
        });
    }

    match op.await {
        Ok(out) => match print_output(output.format, output.quiet, out) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                print_error(output.format, output.quiet, &format!("failed to write output: {e}"));
                exit_codes::RUNTIME_ERROR
            }
        },
        Err(CallError::Api(api)) => {
            print_error_value(output.format, output.quiet, &api.message, &api);
            exit_codes::CALL_FAILED
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::CALL_FAILED
        }
    }
}

fn prepare(
    path: &Path,
    call: &CallArgs,
    connection: &ConnectionArgs,
    auth: &AuthArgs,
) -> Result<(OperationDescriptor, Arguments, RequestConfig), SetupError> {
    let descriptor = load_descriptor(path)?;
    let arguments = build_arguments(call)?;
    let config = build_request_config(connection, auth)?;
    Ok((descriptor, arguments, config))
}

fn print_output(format: OutputFormat, quiet: bool, out: CallOutput) -> std::io::Result<()> {
    if quiet {
        return Ok(());
    }
    match out {
        CallOutput::Raw(raw) => print_result(format, quiet, &raw),
        CallOutput::Body(None) => {}
        CallOutput::Body(Some(Payload::Json(v))) => print_result(format, quiet, &v),
        CallOutput::Body(Some(Payload::Text(s))) => match format {
            OutputFormat::Text => println!("{s}"),
            OutputFormat::Json => print_result(format, quiet, &s),
        },
        CallOutput::Body(Some(Payload::Binary(bytes))) => {
            write_binary(&mut std::io::stdout().lock(), &bytes)?;
        }
    }
    Ok(())
}

fn write_binary(out: &mut impl Write, bytes: &[u8]) -> std::io::Result<()> {
    out.write_all(bytes)?;
    out.flush()
}
