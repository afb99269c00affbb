use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod logging;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "opcall", version, about = "Call HTTP operations from descriptors")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Validate { path, list, output } => cmd::validate::validate_cmd(&path, list, output).await,
        Command::Call {
            path,
            call,
            connection,
            auth,
            output,
        } => cmd::call::call_cmd(&path, call, connection, auth, output).await,
    }
}
