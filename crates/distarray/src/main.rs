mod cmd;
mod exit;
mod json;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "distarray", version, about = "distarray wire protocol CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pack_subcommand() {
        let cli = Cli::try_parse_from([
            "distarray",
            "pack",
            "--json",
            "[[1,2],[3,4]]",
            "--dtype",
            "i64",
            "--targets",
            "cpu,gpu",
            "--seq",
            "7",
        ])
        .expect("pack args should parse");

        match cli.command {
            Command::Pack(args) => {
                assert_eq!(args.seq, 7);
                assert_eq!(args.targets.len(), 2);
                assert!(args.json.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "distarray",
            "pack",
            "--json",
            "[1]",
            "--file",
            "/tmp/tensor.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_inspect_with_bare_flag() {
        let cli = Cli::try_parse_from(["distarray", "inspect", "--bare", "/tmp/wire.bin"])
            .expect("inspect args should parse");

        match cli.command {
            Command::Inspect(args) => {
                assert!(args.bare);
                assert!(args.input.is_some());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_global_format_flag() {
        let cli = Cli::try_parse_from(["distarray", "version", "--format", "json"])
            .expect("global format should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
