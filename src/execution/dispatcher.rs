//! Step dispatch - runs one step's executable unit to completion

use crate::core::{RunContext, StepSpec};
use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Errors raised while dispatching a step.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to launch '{launcher}': {source}")]
    Launch {
        launcher: String,
        #[source]
        source: std::io::Error,
    },

    #[error("step exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

/// Seam between the run loop and the mechanism that executes steps.
///
/// Implementations block (from the caller's perspective) until the step's
/// executable unit exits. Tests inject a recording fake here.
#[async_trait]
pub trait StepDispatcher: Send + Sync {
    async fn dispatch(&self, spec: &StepSpec, ctx: &RunContext) -> Result<(), DispatchError>;
}

/// Dispatcher that shells out to an MLflow-compatible launcher.
///
/// Builds `<launcher> run <ref> -e <entry> --env-manager <mode> -P k=v ...`
/// and waits for the child to exit. The run identity from [`RunContext`] is
/// injected into the child environment only; the orchestrator's own
/// environment is never mutated.
#[derive(Debug, Clone)]
pub struct MlflowDispatcher {
    /// Path to the launcher executable (e.g. "mlflow").
    launcher: String,
}

impl MlflowDispatcher {
    pub fn new(launcher: impl Into<String>) -> Self {
        Self {
            launcher: launcher.into(),
        }
    }

    #[cfg(test)]
    pub fn launcher(&self) -> &str {
        &self.launcher
    }

    /// Argument vector for one step invocation, without the launcher itself.
    fn build_args(spec: &StepSpec) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            spec.executable_ref.clone(),
            "-e".to_string(),
            spec.entry_point.clone(),
            "--env-manager".to_string(),
            spec.isolation.env_manager().to_string(),
        ];

        for (key, value) in &spec.parameters {
            args.push("-P".to_string());
            args.push(format!("{}={}", key, value));
        }

        args
    }
}

#[async_trait]
impl StepDispatcher for MlflowDispatcher {
    async fn dispatch(&self, spec: &StepSpec, ctx: &RunContext) -> Result<(), DispatchError> {
        let args = Self::build_args(spec);
        debug!("Dispatching step {}: {} {}", spec.id, self.launcher, args.join(" "));

        let mut command = Command::new(&self.launcher);
        command.args(&args).kill_on_drop(true);
        for (key, value) in ctx.env_vars() {
            command.env(key, value);
        }

        let output = command.output().await.map_err(|source| DispatchError::Launch {
            launcher: self.launcher.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let code = output.status.code().unwrap_or(-1);
            warn!("Step {} exited with code {}: {}", spec.id, code, stderr);
            return Err(DispatchError::NonZeroExit { code, stderr });
        }

        debug!("Step {} exited cleanly", spec.id);
        Ok(())
    }
}
