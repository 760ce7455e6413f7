use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod inspect;
pub mod pack;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pack a JSON tensor into a framed wire message.
    Pack(PackArgs),
    /// Parse and pretty-print a wire message.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Pack(args) => pack::run(args),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DtypeArg {
    F64,
    I64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OpArg {
    MatMul,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MsgTypeArg {
    Request,
    Response,
    Error,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TargetArg {
    Cpu,
    Gpu,
    Fpga,
}

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Inline JSON tensor (nested arrays).
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the JSON tensor from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
    /// Element type.
    #[arg(long, default_value = "f64")]
    pub dtype: DtypeArg,
    /// Operation to request.
    #[arg(long, default_value = "mat-mul")]
    pub op: OpArg,
    /// Message kind.
    #[arg(long, default_value = "request")]
    pub msg_type: MsgTypeArg,
    /// Acceptable execution targets (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub targets: Vec<TargetArg>,
    /// Sequence id (wraps modulo 2^32).
    #[arg(long, default_value = "0")]
    pub seq: u64,
    /// Write wire bytes to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input file with wire bytes. Reads stdin when omitted.
    pub input: Option<PathBuf>,
    /// Treat the input as a bare encoded tensor with no frame header.
    #[arg(long)]
    pub bare: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
