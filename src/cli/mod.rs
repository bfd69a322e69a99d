//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{RunCommand, StepsCommand, ValidateCommand};
use std::ffi::OsString;

/// Orchestrator for a multi-stage model training pipeline
#[derive(Debug, Parser, Clone)]
#[command(name = "mlpipe")]
#[command(version = "0.1.0")]
#[command(about = "Orchestrator for a multi-stage model training pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the pipeline
    Run(RunCommand),

    /// Validate a pipeline configuration
    Validate(ValidateCommand),

    /// List the pipeline topology
    Steps(StepsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::try_parse_from(["mlpipe", "run", "--file", "config.yaml"]).unwrap();
        match cli.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.file, "config.yaml");
                assert_eq!(cmd.launcher, "mlflow");
                assert!(cmd.steps.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_steps_override() {
        let cli = Cli::try_parse_from([
            "mlpipe",
            "run",
            "--file",
            "config.yaml",
            "--steps",
            "download,basic_cleaning",
        ])
        .unwrap();
        match cli.command {
            Command::Run(cmd) => {
                assert_eq!(cmd.steps.as_deref(), Some("download,basic_cleaning"));
            }
            _ => panic!("expected run command"),
        }
    }
}
