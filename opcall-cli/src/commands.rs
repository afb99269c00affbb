use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse and validate an operation descriptor file.
    Validate {
        path: PathBuf,
        /// The file holds a list of descriptors.
        #[arg(long)]
        list: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Execute the operation described in a descriptor file.
    Call {
        path: PathBuf,
        #[command(flatten)]
        call: CallArgs,
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        auth: AuthArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}
