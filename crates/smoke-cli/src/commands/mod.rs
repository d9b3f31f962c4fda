//! CLI command definitions and dispatch.

pub mod doctor;
pub mod run;

use clap::{Parser, Subcommand};

/// Smoke tests for Maven builds on buildpack builders.
#[derive(Parser, Debug)]
#[command(name = "smoke", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build, run, and health-check the sample app with each builder.
    Run(run::RunArgs),
    /// Check that the required tools are installed.
    Doctor(doctor::DoctorArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => run::execute(args),
        Command::Doctor(args) => doctor::execute(&args),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_name_flags_are_collected_in_order() {
        let cli = Cli::try_parse_from([
            "smoke", "run", "--name", "base", "-n", "tiny", "--name", "base",
        ])
        .unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let names: Vec<&str> = args.names.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["base", "tiny", "base"]);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(Cli::try_parse_from(["smoke", "run", "--name", " "]).is_err());
    }
}
