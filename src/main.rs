use anyhow::{Context, Result};
use mlpipe::cli::commands::{RunCommand, StepsCommand, ValidateCommand};
use mlpipe::cli::output::*;
use mlpipe::cli::{Cli, Command};
use mlpipe::core::config::PipelineConfig;
use mlpipe::core::{ExecutionStrategy, TOPOLOGY};
use mlpipe::execution::{MlflowDispatcher, PipelineRunner};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd).await?,
        Command::Validate(cmd) => validate_config(cmd)?,
        Command::Steps(cmd) => list_steps(cmd)?,
    }

    Ok(())
}

async fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let mut config = PipelineConfig::from_file(&cmd.file)
        .context("Failed to load pipeline config")?;

    println!(
        "{} Loaded pipeline config for: {}",
        INFO,
        style(&config.main.project_name).bold()
    );

    // Apply steps override
    if let Some(directive) = &cmd.steps {
        config.main.steps = directive.clone();
        config.validate().context("Invalid steps override")?;
        println!(
            "{} Steps override: {}",
            INFO,
            style(directive).cyan()
        );
    }

    let dispatcher = MlflowDispatcher::new(&cmd.launcher);
    let mut runner = PipelineRunner::new(config, dispatcher);

    runner.on_event(|event| {
        println!("{}", format_run_event(event));
    });

    println!();
    let result = runner.run().await;

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn validate_config(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline config...", INFO);

    match PipelineConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Project: {}", style(&config.main.project_name).bold());
            println!("  Experiment: {}", style(&config.main.experiment_name).bold());
            println!("  Steps: {}", style(&config.main.steps).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}

fn list_steps(cmd: &StepsCommand) -> Result<()> {
    if cmd.json {
        let steps: Vec<_> = TOPOLOGY
            .iter()
            .map(|step| {
                serde_json::json!({
                    "name": step.as_str(),
                    "enabled": step.strategy() == ExecutionStrategy::Dispatch,
                })
            })
            .collect();
        let data = serde_json::json!({ "topology": steps });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    println!("{} Pipeline topology:", INFO);
    for step in TOPOLOGY {
        match step.strategy() {
            ExecutionStrategy::Dispatch => {
                println!("  {}", style(step.as_str()).bold());
            }
            ExecutionStrategy::NotImplemented => {
                println!(
                    "  {} {}",
                    style(step.as_str()).dim(),
                    style("(not implemented)").dim()
                );
            }
        }
    }

    Ok(())
}
