//! Parley CLI binary entrypoint.
//!
//! This is the main entry point for the `parley` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_cli::cli::{Cli, Commands};
use parley_cli::commands::{RunCommand, TableCommand};
use parley_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Commands::Run(args) => {
            RunCommand::new(args).execute(&mut stdout, &format)?;
        }
        Commands::Table(args) => {
            TableCommand::execute(&mut stdout, &format, args)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_cli::cli::{Format, OpponentKind};

    #[test]
    fn cli_parses_table() {
        let cli = Cli::parse_from(["parley", "table", "--reservation", "0.2"]);
        match cli.command {
            Commands::Table(args) => {
                assert_eq!(args.reservation, 0.2);
                assert_eq!(args.rounds, 200);
            }
            Commands::Run(_) => panic!("expected table command"),
        }
    }

    #[test]
    fn cli_parses_run() {
        let cli = Cli::parse_from([
            "parley",
            "run",
            "--profile-a",
            "a.json",
            "--profile-b",
            "b.json",
            "--opponent",
            "stubborn",
            "--seed",
            "9",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.opponent, OpponentKind::Stubborn);
                assert_eq!(args.seed, Some(9));
                assert_eq!(args.rounds, None);
            }
            Commands::Table(_) => panic!("expected run command"),
        }
    }

    #[test]
    fn cli_respects_format_flag() {
        let cli = Cli::parse_from(["parley", "--format", "json", "table"]);
        assert_eq!(cli.format, Format::Json);
    }

    #[test]
    fn run_with_missing_profile_fails() {
        let cli = Cli::parse_from([
            "parley",
            "run",
            "--profile-a",
            "/nonexistent/a.json",
            "--profile-b",
            "/nonexistent/b.json",
        ]);
        assert!(run(&cli).is_err());
    }
}
