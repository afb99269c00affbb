use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct ConnectionArgs {
    /// Base URL prepended to the descriptor path.
    #[arg(long)]
    pub base: String,
    /// Extra request header; repeatable.
    #[arg(long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,
    /// Send the fetch-style credentials mode with every request.
    #[arg(long, value_name = "MODE")]
    pub credentials: Option<String>,
    /// Cancel the call when it has not settled after this many milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    #[arg(long, default_value_t = 4_194_304)]
    pub max_response_bytes: usize,
}

#[derive(Debug, Args, Clone)]
pub struct AuthArgs {
    /// Bearer token.
    #[arg(long, conflicts_with_all = ["token_env", "token_file"])]
    pub token: Option<String>,
    /// Environment variable holding the token, read per call.
    #[arg(long, conflicts_with = "token_file")]
    pub token_env: Option<String>,
    /// File holding the token, read per call.
    #[arg(long)]
    pub token_file: Option<PathBuf>,
    /// Send the token in this header instead of `Authorization: Bearer`.
    #[arg(long)]
    pub api_key_header: Option<String>,
    #[arg(long, requires = "password", conflicts_with_all = ["token", "token_env", "token_file"])]
    pub username: Option<String>,
    #[arg(long, requires = "username")]
    pub password: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CallArgs {
    /// Argument value; parsed as JSON when possible, otherwise a string.
    #[arg(long = "arg", value_name = "NAME=VALUE")]
    pub args: Vec<String>,
    /// JSON or YAML object of arguments; `--arg` entries override it.
    #[arg(long)]
    pub args_file: Option<PathBuf>,
    /// Binary argument read from a file.
    #[arg(long = "file", value_name = "NAME=PATH")]
    pub files: Vec<String>,
    /// Print the full response envelope instead of the body.
    #[arg(long)]
    pub raw: bool,
}
