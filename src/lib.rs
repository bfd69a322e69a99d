//! mlpipe - orchestrator for a multi-stage model training pipeline

pub mod cli;
pub mod core;
pub mod execution;

// Re-export commonly used types
pub use crate::core::{
    select_steps, ArtifactRef, ConfigError, PipelineConfig, RunContext, RunState, RunStatus,
    StepName, StepSpec, TOPOLOGY,
};
pub use crate::execution::{
    DispatchError, MlflowDispatcher, PipelineError, PipelineRunner, RunEvent, ScopedWorkspace,
    SkipReason, StepDispatcher,
};
