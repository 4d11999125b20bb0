use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rsmd",
    about = "Reactive steps for molecular dynamics",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run reactive cycles alternating with MD
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Parse and check reaction template files
    #[command(visible_alias = "c")]
    Check(CheckArgs),

    /// Print an annotated example reaction file
    Example(ExampleArgs),
}

/// Logging options shared by all commands.
#[derive(Args)]
pub struct LogOptions {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress output and all logs below errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Run configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Last cycle to run
    #[arg(long, value_name = "N")]
    pub cycles: Option<usize>,

    /// Seed of the random source (0 draws one)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Scalar applied to every reaction rate
    #[arg(long, value_name = "F")]
    pub frequency: Option<f64>,

    /// Statistics table output
    #[arg(long, value_name = "FILE")]
    pub statistics: Option<PathBuf>,

    /// Where to write the restart configuration when interrupted
    #[arg(long, value_name = "FILE", default_value = "restart.toml")]
    pub restart_file: PathBuf,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Reaction template files
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ExampleArgs {
    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_overrides_parse() {
        let cli = Cli::try_parse_from([
            "rsmd", "-vv", "run", "-c", "run.toml", "--cycles", "10", "--seed", "3",
        ])
        .unwrap();
        assert_eq!(cli.log.verbose, 2);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.cycles, Some(10));
        assert_eq!(args.seed, Some(3));
        assert_eq!(args.frequency, None);
        assert_eq!(args.restart_file, PathBuf::from("restart.toml"));
    }

    #[test]
    fn check_requires_files() {
        assert!(Cli::try_parse_from(["rsmd", "check"]).is_err());
    }
}
