//! CLI command definitions

use clap::Args;

/// Run the pipeline
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to pipeline YAML config file
    #[arg(short, long)]
    pub file: String,

    /// Override the steps directive ("all" or comma-separated step names)
    #[arg(long)]
    pub steps: Option<String>,

    /// Path to the step launcher executable
    #[arg(long, default_value = "mlflow")]
    pub launcher: String,
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to pipeline YAML config file
    #[arg(short, long)]
    pub file: String,

    /// Output the resolved config in JSON format
    #[arg(long)]
    pub json: bool,
}

/// List the pipeline topology
#[derive(Debug, Args, Clone)]
pub struct StepsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
